/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Randomised, exactly balanced two-team split.
//!
//! A uniform random permutation of the input (Fisher–Yates, driven by an
//! injected [`Rng`]) is cut at the midpoint: the first half plays Offense,
//! the second half Defense. With a uniform source every one of the `n!`
//! orderings is equally likely, so team membership carries no trace of the
//! order in which contacts arrived.
//!
//! # Invariants
//!
//! - `offense.len() == defense.len() == capacity / 2`.
//! - The two groups are disjoint and together contain every input item.
//! - A seeded source reproduces the same split.

use alloc::vec::Vec;

use rand::Rng;

use crate::error::TeamError;
use crate::token::Role;

/// In-place Fisher–Yates shuffle.
///
/// Walks from the last slot down to the second, swapping each slot `i` with a
/// slot drawn uniformly from `0..=i`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Result of a split: two equally sized teams.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition<T> {
    /// Members assigned [`Role::Offense`].
    pub offense: Vec<T>,
    /// Members assigned [`Role::Defense`].
    pub defense: Vec<T>,
}

impl<T: PartialEq> Partition<T> {
    /// Role assigned to `item`, or [`Role::None`] if it was not part of the split.
    pub fn role_of(&self, item: &T) -> Role {
        if self.offense.contains(item) {
            Role::Offense
        } else if self.defense.contains(item) {
            Role::Defense
        } else {
            Role::None
        }
    }
}

impl<T> Partition<T> {
    /// Iterate over every member paired with its role, Offense first.
    pub fn assignments(&self) -> impl Iterator<Item = (&T, Role)> {
        self.offense
            .iter()
            .map(|t| (t, Role::Offense))
            .chain(self.defense.iter().map(|t| (t, Role::Defense)))
    }

    /// Team size (both teams are equal).
    pub fn team_size(&self) -> usize {
        self.offense.len()
    }
}

/// Split `items` into two random teams of `capacity / 2`.
///
/// `items.len()` must equal `capacity`, and `capacity` must be even and at
/// least 2. Anything else is a caller bug and returns
/// [`TeamError::InvalidPartitionSize`] without consuming randomness.
pub fn partition<T, R: Rng + ?Sized>(
    mut items: Vec<T>,
    capacity: usize,
    rng: &mut R,
) -> Result<Partition<T>, TeamError> {
    if items.len() != capacity || capacity < 2 || capacity % 2 != 0 {
        return Err(TeamError::InvalidPartitionSize {
            len: items.len(),
            capacity,
        });
    }

    shuffle(&mut items, rng);
    let defense = items.split_off(capacity / 2);
    Ok(Partition {
        offense: items,
        defense,
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
