// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

/// Construct an [`Ipld`](crate::Ipld) literal.
///
/// ```
/// # use cask_ipld::ipld;
/// let v = ipld!({"name": "bob", "age": 30, "tags": ["a", "b"], "extra": null});
/// ```
///
/// `Link` and `Bytes` take their payload as an expression and compose with
/// the collection forms:
///
/// ```
/// # use cask_ipld::ipld;
/// # use cask_cid::Cid;
/// let v = ipld!({"link": Link(Cid::default()), "payload": Bytes(vec![0x98])});
/// ```
#[macro_export]
macro_rules! ipld {
    ($($tt:tt)+) => {
        $crate::ipld_internal!($($tt)+)
    };
}

/// Token-tree muncher behind [`ipld!`]. Values inside maps and lists are
/// consumed one token tree at a time so the delimited forms (`null`,
/// `Link(..)`, `Bytes(..)`, nested `[..]` and `{..}`) keep working where a
/// single `expr` fragment would swallow or reject them.
#[doc(hidden)]
#[macro_export]
macro_rules! ipld_internal {
    // Array munching. The accumulator carries finished elements; done rules
    // cover both trailing-comma states.
    (@array [$($elems:expr,)*]) => {
        vec![$($elems,)*]
    };
    (@array [$($elems:expr),*]) => {
        vec![$($elems),*]
    };
    (@array [$($elems:expr,)*] null $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::Ipld::Null] $($rest)*)
    };
    (@array [$($elems:expr,)*] true $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::Ipld::Bool(true)] $($rest)*)
    };
    (@array [$($elems:expr,)*] false $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::Ipld::Bool(false)] $($rest)*)
    };
    (@array [$($elems:expr,)*] Link($e:expr) $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::Ipld::Link($e)] $($rest)*)
    };
    (@array [$($elems:expr,)*] Bytes($e:expr) $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::Ipld::Bytes($e)] $($rest)*)
    };
    (@array [$($elems:expr,)*] [$($arr:tt)*] $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::ipld_internal!([$($arr)*])] $($rest)*)
    };
    (@array [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::ipld_internal!({$($map)*})] $($rest)*)
    };
    // Plain expression followed by more elements.
    (@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)* $crate::Ipld::from($next),] $($rest)*)
    };
    // Plain expression as the last element.
    (@array [$($elems:expr,)*] $last:expr) => {
        vec![$($elems,)* $crate::Ipld::from($last)]
    };
    // Comma after a delimited element.
    (@array [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::ipld_internal!(@array [$($elems,)*] $($rest)*)
    };

    // Map munching. Keys are string literals; each rule consumes one entry
    // plus its optional trailing comma.
    (@object $map:ident ()) => {};
    (@object $map:ident ($key:literal : null $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::Ipld::Null);
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : true $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::Ipld::Bool(true));
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : false $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::Ipld::Bool(false));
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : Link($e:expr) $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::Ipld::Link($e));
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : Bytes($e:expr) $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::Ipld::Bytes($e));
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : [$($arr:tt)*] $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::ipld_internal!([$($arr)*]));
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : {$($inner:tt)*} $(, $($rest:tt)*)?)) => {
        $map.insert(($key).into(), $crate::ipld_internal!({$($inner)*}));
        $crate::ipld_internal!(@object $map ($($($rest)*)?));
    };
    (@object $map:ident ($key:literal : $value:expr , $($rest:tt)*)) => {
        $map.insert(($key).into(), $crate::Ipld::from($value));
        $crate::ipld_internal!(@object $map ($($rest)*));
    };
    (@object $map:ident ($key:literal : $value:expr)) => {
        $map.insert(($key).into(), $crate::Ipld::from($value));
    };

    // Entry points.
    (null) => { $crate::Ipld::Null };
    (true) => { $crate::Ipld::Bool(true) };
    (false) => { $crate::Ipld::Bool(false) };
    (Bytes($e:expr)) => { $crate::Ipld::Bytes($e) };
    (Link($e:expr)) => { $crate::Ipld::Link($e) };
    ([ $($tt:tt)* ]) => {
        $crate::Ipld::List($crate::ipld_internal!(@array [] $($tt)*))
    };
    ({ $($tt:tt)* }) => {{
        let mut map = ::std::collections::BTreeMap::<::std::string::String, $crate::Ipld>::new();
        $crate::ipld_internal!(@object map ($($tt)*));
        $crate::Ipld::Map(map)
    }};
    ($other:expr) => { $crate::Ipld::from($other) };
}

use crate::Ipld;
use cask_cid::Cid;
use std::collections::BTreeMap;

impl From<bool> for Ipld {
    fn from(v: bool) -> Self {
        Ipld::Bool(v)
    }
}

impl From<i32> for Ipld {
    fn from(v: i32) -> Self {
        Ipld::Integer(v.into())
    }
}

impl From<i64> for Ipld {
    fn from(v: i64) -> Self {
        Ipld::Integer(v)
    }
}

impl From<u32> for Ipld {
    fn from(v: u32) -> Self {
        Ipld::Integer(v.into())
    }
}

impl From<f64> for Ipld {
    fn from(v: f64) -> Self {
        Ipld::Float(v)
    }
}

impl From<&str> for Ipld {
    fn from(v: &str) -> Self {
        Ipld::String(v.to_owned())
    }
}

impl From<String> for Ipld {
    fn from(v: String) -> Self {
        Ipld::String(v)
    }
}

impl From<Cid> for Ipld {
    fn from(v: Cid) -> Self {
        Ipld::Link(v)
    }
}

impl From<Vec<Ipld>> for Ipld {
    fn from(v: Vec<Ipld>) -> Self {
        Ipld::List(v)
    }
}

impl From<BTreeMap<String, Ipld>> for Ipld {
    fn from(v: BTreeMap<String, Ipld>) -> Self {
        Ipld::Map(v)
    }
}
