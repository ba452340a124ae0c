/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Contact registry: transient contact identifiers → token records.
//!
//! The registry is the only owner of [`TokenRecord`]s. Each successful
//! add, move, role change and removal is mirrored to the [`Renderer`] passed
//! in by the caller; the registry itself holds only the opaque
//! [`TokenHandle`](crate::token::TokenHandle) the renderer returned.
//!
//! # Labels
//!
//! Two labelling policies mirror the two input modes:
//!
//! - [`LabelPolicy::Positional`]: label = size before insertion + 1. Used for
//!   continuous contact where tokens only ever accumulate.
//! - [`LabelPolicy::Sequential`]: a counter that only moves forward until the
//!   next [`clear`](ContactRegistry::clear). Used for discrete taps, where a
//!   removed token's label is never reused.
//!
//! # Invariants
//!
//! - `len() <= capacity()` at all times. Insertion at capacity is
//!   rejected with [`TeamError::CapacityExceeded`].
//! - No two live records share a [`ContactId`].
//! - `clear()` restores the label and id counters to their
//!   initial state.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::TeamError;
use crate::render::Renderer;
use crate::token::{ContactId, Position, Role, TokenRecord};

/// Upper bound on slots reserved up front. Larger registries grow on demand.
const PREALLOC_LIMIT: usize = 64;

/// How new tokens are numbered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelPolicy {
    /// `label = len() + 1` at insertion time.
    #[default]
    Positional,
    /// Monotonic counter, reset only by `clear()`.
    Sequential,
}

/// Mapping from live contact ids to token records, bounded by `capacity`.
#[derive(Debug)]
pub struct ContactRegistry {
    tokens: HashMap<ContactId, TokenRecord>,
    capacity: usize,
    policy: LabelPolicy,
    next_label: u32,
    next_generated: u64,
}

impl ContactRegistry {
    /// Empty registry holding at most `capacity` tokens.
    pub fn new(capacity: usize, policy: LabelPolicy) -> Self {
        Self {
            tokens: HashMap::with_capacity(capacity.min(PREALLOC_LIMIT)),
            capacity,
            policy,
            next_label: 1,
            next_generated: 1,
        }
    }

    // ── Configuration ──────────────────────────────────────────────────────

    /// Maximum number of live tokens.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Labelling policy in effect.
    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    /// Change capacity and labelling policy.
    ///
    /// A partial token set cannot be re-labelled under a different target
    /// count, so every live token is cleared first.
    pub fn reconfigure<R: Renderer + ?Sized>(
        &mut self,
        capacity: usize,
        policy: LabelPolicy,
        renderer: &mut R,
    ) {
        self.clear(renderer);
        self.capacity = capacity;
        self.policy = policy;
    }

    // ── Mutation ───────────────────────────────────────────────────────────

    /// Register a new contact at `position`.
    ///
    /// Rejects with [`TeamError::DuplicateId`] when `id` is already live
    /// and [`TeamError::CapacityExceeded`] when full. On
    /// success the renderer creates the visual token and the new record is
    /// returned with [`Role::None`].
    pub fn add<R: Renderer + ?Sized>(
        &mut self,
        id: ContactId,
        position: Position,
        renderer: &mut R,
    ) -> Result<&TokenRecord, TeamError> {
        if self.tokens.contains_key(&id) {
            return Err(TeamError::DuplicateId(id));
        }
        if self.tokens.len() >= self.capacity {
            return Err(TeamError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let label = match self.policy {
            LabelPolicy::Positional => self.tokens.len() as u32 + 1,
            LabelPolicy::Sequential => {
                let l = self.next_label;
                self.next_label += 1;
                l
            }
        };
        let handle = renderer.create_token(position, label);
        let rec = self
            .tokens
            .entry(id)
            .or_insert_with(|| TokenRecord::new(id, label, position, handle));
        Ok(&*rec)
    }

    /// Register a tap token under a freshly minted [`ContactId::Generated`] id.
    ///
    /// A rejected tap consumes neither an id nor a label.
    pub fn add_generated<R: Renderer + ?Sized>(
        &mut self,
        position: Position,
        renderer: &mut R,
    ) -> Result<&TokenRecord, TeamError> {
        if self.is_full() {
            return Err(TeamError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = ContactId::Generated(self.next_generated);
        self.next_generated += 1;
        self.add(id, position, renderer)
    }

    /// Update the position of a live token. Role and label are untouched.
    pub fn move_to<R: Renderer + ?Sized>(
        &mut self,
        id: ContactId,
        position: Position,
        renderer: &mut R,
    ) -> Result<&TokenRecord, TeamError> {
        let rec = self.tokens.get_mut(&id).ok_or(TeamError::UnknownId(id))?;
        rec.position = position;
        renderer.move_token(rec.handle, position);
        Ok(&*rec)
    }

    /// Remove a live token and destroy its visual.
    ///
    /// Unknown ids leave the registry unchanged.
    pub fn remove<R: Renderer + ?Sized>(
        &mut self,
        id: ContactId,
        renderer: &mut R,
    ) -> Result<TokenRecord, TeamError> {
        let rec = self.tokens.remove(&id).ok_or(TeamError::UnknownId(id))?;
        renderer.destroy_token(rec.handle);
        Ok(rec)
    }

    /// Remove every token and reset counters.
    pub fn clear<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        for (_, rec) in self.tokens.drain() {
            renderer.destroy_token(rec.handle);
        }
        self.next_label = 1;
        self.next_generated = 1;
    }

    /// Set the role of one token and show it.
    pub fn set_role<R: Renderer + ?Sized>(
        &mut self,
        id: ContactId,
        role: Role,
        renderer: &mut R,
    ) -> Result<(), TeamError> {
        let rec = self.tokens.get_mut(&id).ok_or(TeamError::UnknownId(id))?;
        rec.role = role;
        renderer.set_token_role(rec.handle, role);
        Ok(())
    }

    /// Reset every token to [`Role::None`]. Returns how many had a role.
    pub fn reset_roles<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> usize {
        let mut reset = 0;
        for rec in self.tokens.values_mut() {
            if rec.role.is_assigned() {
                rec.role = Role::None;
                renderer.set_token_role(rec.handle, Role::None);
                reset += 1;
            }
        }
        reset
    }

    /// Apply `f` to every record's position, forwarding changed positions to the renderer.
    pub fn reposition<R, F>(&mut self, renderer: &mut R, mut f: F) -> usize
    where
        R: Renderer + ?Sized,
        F: FnMut(Position) -> Option<Position>,
    {
        let mut moved = 0;
        for rec in self.tokens.values_mut() {
            if let Some(p) = f(rec.position) {
                rec.position = p;
                renderer.move_token(rec.handle, p);
                moved += 1;
            }
        }
        moved
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Number of live tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// `true` when no token is live.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `true` when `len() == capacity()`.
    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.capacity
    }

    /// `true` if `id` is live.
    pub fn contains(&self, id: ContactId) -> bool {
        self.tokens.contains_key(&id)
    }

    /// Record for `id`, if live.
    pub fn get(&self, id: ContactId) -> Option<&TokenRecord> {
        self.tokens.get(&id)
    }

    /// All live records, ordered by label.
    pub fn records(&self) -> Vec<&TokenRecord> {
        let mut out: Vec<&TokenRecord> = self.tokens.values().collect();
        out.sort_by_key(|r| (r.label, r.id));
        out
    }

    /// All live ids, ordered by label.
    pub fn ids(&self) -> Vec<ContactId> {
        self.records().into_iter().map(|r| r.id).collect()
    }

    /// Iterate over live records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenRecord> {
        self.tokens.values()
    }

    /// `(offense, defense)` counts among live tokens.
    pub fn role_counts(&self) -> (usize, usize) {
        self.tokens
            .values()
            .fold((0, 0), |(off, def), r| match r.role {
                Role::Offense => (off + 1, def),
                Role::Defense => (off, def + 1),
                Role::None => (off, def),
            })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderLog;

    fn at(x: f32) -> Position {
        Position::new(x, x)
    }

    #[test]
    fn test_add_assigns_positional_labels() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(4, LabelPolicy::Positional);
        for n in 0..3u64 {
            let rec = reg.add(ContactId::Contact(n), at(n as f32), &mut r).unwrap();
            assert_eq!(rec.label, n as u32 + 1);
            assert_eq!(rec.role, Role::None);
        }
        assert_eq!(reg.len(), 3);
        assert_eq!(r.live_count(), 3);
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(usize::MAX - 1, LabelPolicy::Sequential);
        assert_eq!(reg.capacity(), usize::MAX - 1);
        reg.add(ContactId::Contact(1), at(1.0), &mut r).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(!reg.is_full());
    }

    #[test]
    fn test_add_rejects_at_capacity() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(2, LabelPolicy::Positional);
        reg.add(ContactId::Contact(1), at(1.0), &mut r).unwrap();
        reg.add(ContactId::Contact(2), at(2.0), &mut r).unwrap();
        let err = reg.add(ContactId::Contact(3), at(3.0), &mut r).unwrap_err();
        assert_eq!(err, TeamError::CapacityExceeded { capacity: 2 });
        assert_eq!(reg.len(), 2);
        assert_eq!(r.live_count(), 2, "rejected add must not create a visual");
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(4, LabelPolicy::Positional);
        reg.add(ContactId::Contact(7), at(1.0), &mut r).unwrap();
        let err = reg.add(ContactId::Contact(7), at(2.0), &mut r).unwrap_err();
        assert_eq!(err, TeamError::DuplicateId(ContactId::Contact(7)));
        assert_eq!(reg.get(ContactId::Contact(7)).unwrap().position, at(1.0));
    }

    #[test]
    fn test_sequential_labels_survive_removal() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(4, LabelPolicy::Sequential);
        let a = reg.add_generated(at(1.0), &mut r).unwrap().id;
        let _b = reg.add_generated(at(2.0), &mut r).unwrap().id;
        reg.remove(a, &mut r).unwrap();
        let c = reg.add_generated(at(3.0), &mut r).unwrap();
        assert_eq!(c.label, 3);
        assert_eq!(c.id, ContactId::Generated(3));
    }

    #[test]
    fn test_rejected_tap_consumes_nothing() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(2, LabelPolicy::Sequential);
        reg.add_generated(at(1.0), &mut r).unwrap();
        reg.add_generated(at(2.0), &mut r).unwrap();
        assert!(reg.add_generated(at(3.0), &mut r).is_err());
        let first = reg.ids()[0];
        reg.remove(first, &mut r).unwrap();
        let rec = reg.add_generated(at(4.0), &mut r).unwrap();
        assert_eq!(rec.label, 3);
        assert_eq!(rec.id, ContactId::Generated(3));
    }

    #[test]
    fn test_move_updates_position_only() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(2, LabelPolicy::Positional);
        let id = ContactId::Contact(5);
        reg.add(id, at(1.0), &mut r).unwrap();
        reg.set_role(id, Role::Defense, &mut r).unwrap();
        let rec = reg.move_to(id, at(8.0), &mut r).unwrap();
        assert_eq!(rec.position, at(8.0));
        assert_eq!(rec.role, Role::Defense);
        assert_eq!(rec.label, 1);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(2, LabelPolicy::Positional);
        reg.add(ContactId::Contact(1), at(1.0), &mut r).unwrap();
        let ghost = ContactId::Contact(99);
        assert_eq!(reg.move_to(ghost, at(0.0), &mut r).unwrap_err(), TeamError::UnknownId(ghost));
        assert_eq!(reg.remove(ghost, &mut r).unwrap_err(), TeamError::UnknownId(ghost));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(4, LabelPolicy::Sequential);
        reg.add_generated(at(1.0), &mut r).unwrap();
        reg.add_generated(at(2.0), &mut r).unwrap();
        reg.clear(&mut r);
        assert!(reg.is_empty());
        assert_eq!(r.live_count(), 0);
        let rec = reg.add_generated(at(3.0), &mut r).unwrap();
        assert_eq!(rec.label, 1);
        assert_eq!(rec.id, ContactId::Generated(1));
    }

    #[test]
    fn test_reset_roles_and_counts() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(4, LabelPolicy::Positional);
        for n in 0..4u64 {
            reg.add(ContactId::Contact(n), at(0.0), &mut r).unwrap();
        }
        reg.set_role(ContactId::Contact(0), Role::Offense, &mut r).unwrap();
        reg.set_role(ContactId::Contact(1), Role::Defense, &mut r).unwrap();
        assert_eq!(reg.role_counts(), (1, 1));
        assert_eq!(reg.reset_roles(&mut r), 2);
        assert_eq!(reg.role_counts(), (0, 0));
    }

    #[test]
    fn test_reconfigure_clears() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(2, LabelPolicy::Positional);
        reg.add(ContactId::Contact(1), at(0.0), &mut r).unwrap();
        reg.reconfigure(6, LabelPolicy::Sequential, &mut r);
        assert!(reg.is_empty());
        assert_eq!(r.live_count(), 0);
        assert_eq!(reg.capacity(), 6);
        assert_eq!(reg.policy(), LabelPolicy::Sequential);
    }

    #[test]
    fn test_records_sorted_by_label() {
        let mut r = RenderLog::new();
        let mut reg = ContactRegistry::new(4, LabelPolicy::Positional);
        for n in [40u64, 10, 30] {
            reg.add(ContactId::Contact(n), at(0.0), &mut r).unwrap();
        }
        let labels: Vec<u32> = reg.records().iter().map(|r| r.label).collect();
        assert_eq!(labels, [1, 2, 3]);
        assert_eq!(reg.ids()[0], ContactId::Contact(40));
    }
}
