// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for rejected list operations.

use thiserror::Error;

/// Why a list operation was rejected.
///
/// Rejection is always a no-op: the list, its counts, and its sink are left
/// untouched, and the `Err` value is the caller-checked sentinel. Operations
/// that merely *clamp* a request (an insert position past the end of a
/// segment, a removal range reaching beyond it) are not rejected; they
/// proceed with the adjusted range and report the adjustment as a `log`
/// diagnostic only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ListError {
    /// A logical position referred outside its segment's current range.
    ///
    /// Insert positions are clamped instead and never produce this error.
    #[error("position {position} out of range (segment length {len})")]
    PositionOutOfRange {
        /// The rejected logical position.
        position: usize,
        /// The segment's length at the time of the call.
        len: usize,
    },
    /// A bulk insert was called with no items.
    #[error("empty item batch")]
    EmptyBatch,
    /// A range removal was asked to remove zero items.
    #[error("removal count must be non-zero")]
    ZeroCount,
    /// The inserted group is equal to an already present group.
    ///
    /// Groups must be distinguishable by value-equality so that identity
    /// lookups can tell them apart.
    #[error("an equal group already exists")]
    DuplicateGroup,
    /// An identity-based lookup or removal found no equal item in the
    /// searched segment.
    #[error("no matching item in segment")]
    NotFound,
}
