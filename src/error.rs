/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Error taxonomy for registry, partition and session operations.
//!
//! None of these are fatal to a running session. `CapacityExceeded`,
//! `DuplicateId` and `UnknownId` are ordinary outcomes of racing input events
//! and are recovered by the [`Session`](crate::session::Session).
//! `InvalidPartitionSize` signals a broken state-machine invariant.

use crate::token::ContactId;

/// Errors returned by the team-tap core.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TeamError {
    /// The registry already holds `capacity` tokens.
    #[error("registry is full ({capacity} tokens)")]
    CapacityExceeded {
        /// Configured capacity at the time of rejection.
        capacity: usize,
    },

    /// A token with this id is already live.
    #[error("duplicate contact id {0}")]
    DuplicateId(ContactId),

    /// No live token has this id.
    #[error("unknown contact id {0}")]
    UnknownId(ContactId),

    /// Partition was asked to split a set whose size does not match an even capacity.
    #[error("cannot partition {len} tokens with capacity {capacity}")]
    InvalidPartitionSize {
        /// Number of items handed to the partition.
        len: usize,
        /// Capacity the split was requested for.
        capacity: usize,
    },

    /// Capacity must be a positive even integer.
    #[error("capacity must be a positive even number, got {0}")]
    InvalidCapacity(usize),
}

/// Check that `capacity` is a usable team size: even and at least 2.
pub fn validate_capacity(capacity: usize) -> Result<usize, TeamError> {
    if capacity >= 2 && capacity % 2 == 0 {
        Ok(capacity)
    } else {
        Err(TeamError::InvalidCapacity(capacity))
    }
}
