// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{verify_keyed, BlockStore, Error};
use cask_cid::Cid;
use cask_db::Store;
use tokio_util::sync::CancellationToken;

/// Contract with the block-exchange collaborator: asynchronously fetch the
/// bytes for a CID from the network. Implementations retry and time out on
/// their side; the store does not.
#[async_trait::async_trait]
pub trait BlockProvider: Send + Sync {
    async fn fetch(&self, cid: &Cid, token: &CancellationToken) -> Result<Vec<u8>, Error>;
}

/// A block store that falls back to an exchange provider on local misses.
/// Fetched bytes are verified against the requested CID before they are
/// written back, so the composition stays trustless.
pub struct FallbackBlockstore<S, P> {
    store: S,
    provider: P,
}

impl<S, P> FallbackBlockstore<S, P>
where
    S: Store,
    P: BlockProvider,
{
    pub fn new(store: S, provider: P) -> Self {
        Self { store, provider }
    }

    pub fn local(&self) -> &S {
        &self.store
    }

    pub async fn get_or_fetch(
        &self,
        cid: &Cid,
        token: &CancellationToken,
    ) -> Result<Vec<u8>, Error> {
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.store.get_block(cid) {
            Ok(data) => Ok(data),
            Err(Error::NotFound(_)) => {
                tracing::debug!(%cid, "local miss, fetching from provider");
                let data = self.provider.fetch(cid, token).await?;
                verify_keyed(cid, &data).map_err(|_| Error::HashMismatch(*cid))?;
                self.store.put_keyed(cid, &data)?;
                Ok(data)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cask_cid::Prefix;
    use cask_db::MemoryDb;

    struct FixedProvider(Vec<u8>);

    #[async_trait::async_trait]
    impl BlockProvider for FixedProvider {
        async fn fetch(&self, _cid: &Cid, _token: &CancellationToken) -> Result<Vec<u8>, Error> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn miss_fetches_verifies_and_caches() {
        let cid = cask_cid::new_from_prefix(&Prefix::default(), b"remote bytes").unwrap();
        let fb = FallbackBlockstore::new(MemoryDb::new(), FixedProvider(b"remote bytes".to_vec()));
        let token = CancellationToken::new();

        let data = fb.get_or_fetch(&cid, &token).await.unwrap();
        assert_eq!(data, b"remote bytes");
        // Second read is served locally.
        assert!(fb.local().contains(&cid).unwrap());
    }

    #[tokio::test]
    async fn corrupt_fetch_is_rejected() {
        let cid = cask_cid::new_from_prefix(&Prefix::default(), b"expected").unwrap();
        let fb = FallbackBlockstore::new(MemoryDb::new(), FixedProvider(b"tampered".to_vec()));
        let token = CancellationToken::new();

        let err = fb.get_or_fetch(&cid, &token).await.unwrap_err();
        assert!(matches!(err, Error::HashMismatch(_)));
        assert!(!fb.local().contains(&cid).unwrap());
    }

    #[tokio::test]
    async fn cancelled_before_fetch() {
        let cid = cask_cid::new_from_prefix(&Prefix::default(), b"unreached").unwrap();
        let fb = FallbackBlockstore::new(MemoryDb::new(), FixedProvider(vec![]));
        let token = CancellationToken::new();
        token.cancel();

        let err = fb.get_or_fetch(&cid, &token).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
