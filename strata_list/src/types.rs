// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared across the crate: segment selectors, inverse-lookup
//! results, and the view-type handle.

/// One of the four addressable regions of the flat sequence.
///
/// Group children are addressed through their owning group rather than as a
/// region of their own, so they do not appear here; see
/// [`ItemRef::GroupChild`] for the inverse direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The leading header region.
    Header,
    /// The flat (ungrouped) child region, directly after the headers.
    Child,
    /// The group region: each group item followed by its own children.
    ///
    /// Scans over this segment visit the group items only, skipping their
    /// children.
    Group,
    /// The trailing footer region.
    Footer,
}

/// Result of resolving a flat index back to a logical position.
///
/// Returned by [`SegmentedList::locate`](crate::SegmentedList::locate). All
/// positions are zero-based and relative to the start of their segment (or,
/// for group children, to the start of their group's child run).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemRef {
    /// Header at the given header position.
    Header(usize),
    /// Flat child at the given child position.
    Child(usize),
    /// The group item of the group at the given group position.
    Group(usize),
    /// A child of a group.
    GroupChild {
        /// Position of the owning group.
        group: usize,
        /// Position of the child within that group's child run.
        child: usize,
    },
    /// Footer at the given footer position.
    Footer(usize),
}

/// Integer classification of an item used for rendering dispatch and
/// ordering constraints.
///
/// This is a small, copyable handle; the host defines the meaning of
/// individual values (for example via an enum-to-view-type mapping or static
/// constants). Classification itself is supplied through
/// [`ViewTypeModel`](crate::ViewTypeModel).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewType(pub i32);
