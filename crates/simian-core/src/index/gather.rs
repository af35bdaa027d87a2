//! Pruned best-first search.

use std::ops::ControlFlow;

use tracing::trace;

use super::NearMatch;
use crate::error::{StoreError, StoreResult};
use crate::fingerprint::Fingerprint;
use crate::node::{ChildRef, IndexNode};
use crate::store::IndexStore;

/// Collects up to `max_results` entries within `max_difference` of `query`.
///
/// `Break` means the buffer is full and the whole walk stops.
pub(crate) struct Gather<'a, S: ?Sized> {
    store: &'a S,
    query: &'a Fingerprint,
    max_results: usize,
    max_difference: f64,
    results: Vec<NearMatch>,
}

impl<'a, S> Gather<'a, S>
where
    S: IndexStore + ?Sized,
{
    pub(crate) fn new(
        store: &'a S,
        query: &'a Fingerprint,
        max_results: usize,
        max_difference: f64,
    ) -> Self {
        Self {
            store,
            query,
            max_results,
            max_difference,
            results: Vec::with_capacity(max_results.min(64)),
        }
    }

    /// Visit the children of `node`: the one matching the query's prefix
    /// first, then the rest by increasing prefix distance.
    pub(crate) fn gather(
        &mut self,
        node: &IndexNode,
        depth: usize,
    ) -> StoreResult<ControlFlow<()>> {
        if !node.is_internal() {
            return Ok(ControlFlow::Continue(()));
        }

        let query_prefix = self.query.prefix(depth);
        let exact = self.store.child(&query_prefix, node)?;

        if let Some(child) = &exact {
            if self.visit(child, depth + 1)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        let mut siblings: Vec<(&ChildRef, f64)> = node
            .children()
            .iter()
            .filter(|c| exact.as_ref().map_or(true, |e| e.id() != c.id))
            .map(|c| (c, c.prefix.distance(&query_prefix)))
            .collect();
        siblings.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (child_ref, prefix_difference) in siblings {
            trace!(child = %child_ref.id, depth, prefix_difference, "Visiting sibling");
            let child = self
                .store
                .child(&child_ref.prefix, node)?
                .ok_or(StoreError::NodeNotFound { id: child_ref.id })?;
            if self.visit(&child, depth + 1)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn visit(&mut self, child: &IndexNode, depth: usize) -> StoreResult<ControlFlow<()>> {
        if self.gather(child, depth)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        Ok(self.scan(child))
    }

    /// Add the node's own entries that are close enough.
    pub(crate) fn scan(&mut self, node: &IndexNode) -> ControlFlow<()> {
        if self.results.len() >= self.max_results {
            return ControlFlow::Break(());
        }

        for entry in node.entries() {
            let difference = entry.fingerprint().distance(self.query);
            if difference > self.max_difference {
                continue;
            }

            self.results.push(NearMatch {
                entry: entry.clone(),
                difference,
            });
            if self.results.len() >= self.max_results {
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    pub(crate) fn into_results(self) -> Vec<NearMatch> {
        self.results
    }
}
