// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The suite dispatch queue and the whitelist that can restrict and reorder
//! it. See spec.md §3 for the invariants this module enforces.

use std::collections::{HashSet, VecDeque};

use crate::suite::SuiteId;

/// An ordered, possibly-empty restriction on which suites run and in what
/// order. A non-empty whitelist forces the queue to contain only the listed
/// names, dispatched in the list's order.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    /// Suite names in forced dispatch order. Empty means "no restriction".
    names: Vec<String>,
    /// `whitelist \ queued` — names not yet seen via stats or discovery.
    awaited: HashSet<String>,
}

impl Whitelist {
    pub fn new(names: Vec<String>) -> Self {
        let awaited = names.iter().cloned().collect();
        Self { names, awaited }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Position of `name` in the forced order, for sorting.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Mark a name as seen (present in stats or reported via discovery).
    /// No-op if the name isn't part of the whitelist.
    pub fn mark_seen(&mut self, name: &str) {
        self.awaited.remove(name);
    }

    /// True while any whitelisted suite has not yet been seen. An empty
    /// whitelist is always satisfied (there is nothing to await).
    pub fn is_satisfied(&self) -> bool {
        self.awaited.is_empty()
    }

    /// Names still awaited, for error messages ("missing forced suites").
    pub fn awaited(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| self.awaited.contains(n.as_str()))
            .map(|n| n.as_str())
            .collect()
    }
}

/// The ordered sequence of suites awaiting dispatch.
///
/// Invariants (spec.md §3):
/// - no duplicates within a run (tracked via `known`, which never shrinks —
///   a suite popped for dispatch stays "known" so it cannot be re-queued);
/// - initial order is descending by recorded duration, with suites of
///   unknown duration inserted at the front;
/// - a non-empty whitelist restricts membership and order, both at
///   construction and every time the whitelist becomes fully satisfied.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    order: VecDeque<SuiteId>,
    known: HashSet<SuiteId>,
    whitelist: Whitelist,
}

impl Queue {
    pub fn new(whitelist: Whitelist) -> Self {
        Self {
            order: VecDeque::new(),
            known: HashSet::new(),
            whitelist,
        }
    }

    /// Seed the initial queue from the framework's suite enumeration, paired
    /// with a recorded duration when the stats store has one.
    ///
    /// Suites are accepted only if the whitelist is empty or names the
    /// suite. Accepted suites are sorted descending by duration, with
    /// unknown-duration suites placed before all known-duration ones
    /// (spec.md §3: "the design prefers running a fast unknown early over
    /// stalling the tail on a slow unknown"). When the whitelist is
    /// non-empty, whitelist order wins over duration order instead.
    pub fn seed(&mut self, suites: Vec<(SuiteId, Option<f64>)>) {
        let mut accepted: Vec<(SuiteId, Option<f64>)> = suites
            .into_iter()
            .filter(|(id, _)| self.accepts(&id.name))
            .collect();

        if self.whitelist.is_empty() {
            accepted.sort_by(|a, b| match (a.1, b.1) {
                (None, None) => std::cmp::Ordering::Equal,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal),
            });
        } else {
            accepted.sort_by_key(|(id, _)| self.whitelist.position(&id.name).unwrap_or(usize::MAX));
        }

        for (id, _duration) in accepted {
            self.whitelist.mark_seen(&id.name);
            if self.known.insert(id.clone()) {
                self.order.push_back(id);
            }
        }
    }

    /// Report a suite discovered mid-run (the `NEW SUITE` wire message).
    ///
    /// Returns `true` if the suite was actually added (a suite outside an
    /// active whitelist, or one already known, is a no-op per spec.md §4.1).
    /// Unknown-duration suites go to the *front* of the queue. If this
    /// discovery causes the whitelist to become fully satisfied, the whole
    /// queue is immediately re-sorted into whitelist order.
    pub fn insert_discovered(&mut self, id: SuiteId) -> bool {
        if !self.accepts(&id.name) {
            return false;
        }

        self.whitelist.mark_seen(&id.name);

        let inserted = if self.known.insert(id.clone()) {
            self.order.push_front(id);
            true
        } else {
            false
        };

        if !self.whitelist.is_empty() && self.whitelist.is_satisfied() {
            self.reorder_by_whitelist();
        }

        inserted
    }

    fn accepts(&self, name: &str) -> bool {
        self.whitelist.is_empty() || self.whitelist.contains(name)
    }

    fn reorder_by_whitelist(&mut self) {
        let mut items: Vec<SuiteId> = self.order.drain(..).collect();
        items.sort_by_key(|id| self.whitelist.position(&id.name).unwrap_or(usize::MAX));
        self.order = items.into();
    }

    /// Pop the next suite to dispatch, if any. The popped suite remains
    /// "known" so it can never be re-queued (at-most-once dispatch).
    pub fn pop(&mut self) -> Option<SuiteId> {
        self.order.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// True when dispatch must stall: the whitelist has unresolved names,
    /// or the queue is empty but more suites may still arrive (the caller
    /// is expected to combine this with "is discovery still running?").
    pub fn awaiting_whitelist(&self) -> bool {
        !self.whitelist.is_empty() && !self.whitelist.is_satisfied()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
