// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::Error;
use cask_cid::{Code, Prefix, Version, RAW};
use cask_db::{Db, DbConfig};
use serde::{Deserialize, Serialize};

/// Default CID prefix for new blocks, in config-file form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    pub version: u64,
    pub codec: u64,
    pub mh_type: u64,
    pub mh_len: Option<usize>,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            version: 1,
            codec: RAW,
            mh_type: Code::Sha2_256.into(),
            mh_len: None,
        }
    }
}

impl PrefixConfig {
    pub fn to_prefix(&self) -> Result<Prefix, cask_cid::Error> {
        let version = Version::try_from(self.version)?;
        Prefix::new(version, self.codec, self.mh_type, self.mh_len)
    }
}

/// Block store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlockstoreConfig {
    pub db: DbConfig,
    pub default_prefix: PrefixConfig,
    pub max_identity_bytes: Option<usize>,
}

impl BlockstoreConfig {
    pub fn max_identity_bytes(&self) -> usize {
        self.max_identity_bytes
            .unwrap_or(cask_cid::DEFAULT_MAX_IDENTITY_BYTES)
    }
}

/// Open the configured backend. The returned handle owns the backing store;
/// dropping it releases the engine.
pub fn open_blockstore(config: &BlockstoreConfig) -> Result<Db, Error> {
    config.default_prefix.to_prefix()?;
    Ok(Db::open(&config.db)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config: BlockstoreConfig = toml::from_str("").unwrap();
        assert_eq!(config.db, DbConfig::Memory);
        let prefix = config.default_prefix.to_prefix().unwrap();
        assert_eq!(prefix, Prefix::default());
    }

    #[test]
    fn config_round_trips() {
        let config = BlockstoreConfig {
            db: DbConfig::File {
                path: "/tmp/blocks".into(),
            },
            default_prefix: PrefixConfig {
                codec: cask_cid::DAG_CBOR,
                mh_type: Code::Blake3_256.into(),
                ..Default::default()
            },
            max_identity_bytes: Some(32),
        };
        let s = toml::to_string(&config).unwrap();
        let back: BlockstoreConfig = toml::from_str(&s).unwrap();
        assert_eq!(config, back);
    }
}
