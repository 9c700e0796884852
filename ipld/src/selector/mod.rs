// Copyright 2024-2026 Cask Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Selectors describe which parts of a DAG a traversal visits.
//!
//! The model is compositional: a selector is interpreted against one node
//! at a time, and [`Selector::explore`] yields the selector that applies to
//! the child behind a path segment. `ExploreRecursiveEdge` marks the points
//! inside an `ExploreRecursive` sequence where the recursion restarts.

mod visitor;
mod walk;

pub use self::visitor::{collect, find_one, walk_stream};
pub use self::walk::{
    Budget, LastBlockInfo, LinkResolver, Progress, VisitReason, WalkParams,
};

use crate::{Ipld, PathSegment};
use indexmap::IndexMap;
use serde::Deserialize;

/// Bounds link recursion in `ExploreRecursive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RecursionLimit {
    /// No bound; termination relies on the seen-set and budgets.
    None,
    /// Recurse at most this many levels.
    Depth(u64),
}

/// A walk description over the IPLD data model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Selector {
    /// Marks the current node as a match.
    Matcher,
    /// Explore every child, applying `next` to each.
    ExploreAll { next: Box<Selector> },
    /// Explore the named fields of a map, each with its own selector.
    /// Field order is preserved and drives visitation order.
    ExploreFields {
        fields: IndexMap<String, Selector>,
    },
    /// Explore a single list index.
    ExploreIndex { index: usize, next: Box<Selector> },
    /// Apply every member selector to the current node at once.
    ExploreUnion(Vec<Selector>),
    /// Repeatedly apply `sequence`, restarting at every
    /// `ExploreRecursiveEdge` it reaches, up to `limit`. `current` is the
    /// interpreter's in-flight position and starts as `None`.
    ExploreRecursive {
        limit: RecursionLimit,
        sequence: Box<Selector>,
        #[serde(skip)]
        current: Option<Box<Selector>>,
    },
    /// Marks a recursion restart point. Only valid inside the sequence of
    /// an `ExploreRecursive`.
    ExploreRecursiveEdge,
}

impl Selector {
    /// Recursively explore the whole DAG, matching every node. The default
    /// selector for whole-graph operations such as CAR export.
    pub fn explore_all_recursively() -> Self {
        Selector::ExploreRecursive {
            limit: RecursionLimit::None,
            sequence: Box::new(Selector::ExploreUnion(vec![
                Selector::Matcher,
                Selector::ExploreAll {
                    next: Box::new(Selector::ExploreRecursiveEdge),
                },
            ])),
            current: None,
        }
    }

    /// The child segments this selector cares about, or `None` for all of
    /// them.
    pub fn interests(&self) -> Option<Vec<PathSegment>> {
        match self {
            Selector::Matcher => Some(vec![]),
            Selector::ExploreAll { .. } => None,
            Selector::ExploreFields { fields } => {
                Some(fields.keys().map(|k| PathSegment::from(k.as_str())).collect())
            }
            Selector::ExploreIndex { index, .. } => Some(vec![PathSegment::Int(*index)]),
            Selector::ExploreUnion(selectors) => {
                let mut segments = vec![];
                for sel in selectors {
                    // A single open-ended member opens the whole union.
                    segments.extend(sel.interests()?);
                }
                Some(segments)
            }
            Selector::ExploreRecursive {
                sequence, current, ..
            } => current
                .as_ref()
                .map(|c| c.interests())
                .unwrap_or_else(|| sequence.interests()),
            Selector::ExploreRecursiveEdge => Some(vec![]),
        }
    }

    /// Interpret one step: the selector that applies to the child of `ipld`
    /// at `segment`, or `None` when the walk does not continue there.
    pub fn explore(self, ipld: &Ipld, segment: &PathSegment) -> Option<Selector> {
        match self {
            Selector::Matcher | Selector::ExploreRecursiveEdge => None,
            Selector::ExploreAll { next } => Some(*next),
            Selector::ExploreFields { mut fields } => {
                ipld.lookup_segment(segment)?;
                fields.shift_remove(&segment.to_string())
            }
            Selector::ExploreIndex { index, next } => match ipld {
                Ipld::List(_) if segment.to_index() == Some(index) => Some(*next),
                _ => None,
            },
            Selector::ExploreUnion(selectors) => {
                let explored: Vec<_> = selectors
                    .into_iter()
                    .filter_map(|s| s.explore(ipld, segment))
                    .collect();
                match explored.len() {
                    0 => None,
                    1 => explored.into_iter().next(),
                    _ => Some(Selector::ExploreUnion(explored)),
                }
            }
            Selector::ExploreRecursive {
                limit,
                sequence,
                current,
            } => {
                let next = current
                    .map(|c| *c)
                    .unwrap_or_else(|| (*sequence).clone())
                    .explore(ipld, segment)?;

                if !has_recursive_edge(&next) {
                    return Some(Selector::ExploreRecursive {
                        limit,
                        sequence,
                        current: Some(next.into()),
                    });
                }

                match limit {
                    RecursionLimit::Depth(depth) => {
                        if depth < 2 {
                            return replace_recursive_edge(next, None);
                        }
                        replace_recursive_edge(
                            next,
                            Some(Selector::ExploreRecursive {
                                limit: RecursionLimit::Depth(depth - 1),
                                sequence,
                                current: None,
                            }),
                        )
                    }
                    RecursionLimit::None => replace_recursive_edge(
                        next,
                        Some(Selector::ExploreRecursive {
                            limit,
                            sequence,
                            current: None,
                        }),
                    ),
                }
            }
        }
    }

    /// Whether the current node is a match.
    pub fn decide(&self) -> bool {
        match self {
            Selector::Matcher => true,
            Selector::ExploreUnion(selectors) => selectors.iter().any(Selector::decide),
            Selector::ExploreRecursive {
                sequence, current, ..
            } => current
                .as_ref()
                .map(|c| c.decide())
                .unwrap_or_else(|| sequence.decide()),
            _ => false,
        }
    }
}

fn has_recursive_edge(selector: &Selector) -> bool {
    match selector {
        Selector::ExploreRecursiveEdge => true,
        Selector::ExploreUnion(selectors) => selectors.iter().any(has_recursive_edge),
        _ => false,
    }
}

fn replace_recursive_edge(next: Selector, replacement: Option<Selector>) -> Option<Selector> {
    match next {
        Selector::ExploreRecursiveEdge => replacement,
        Selector::ExploreUnion(selectors) => {
            let replaced: Vec<_> = selectors
                .into_iter()
                .filter_map(|s| replace_recursive_edge(s, replacement.clone()))
                .collect();
            match replaced.len() {
                0 => None,
                1 => replaced.into_iter().next(),
                _ => Some(Selector::ExploreUnion(replaced)),
            }
        }
        _ => Some(next),
    }
}
