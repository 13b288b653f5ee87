// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The segmented list itself: flat storage, count bookkeeping, and the
//! mutation surface.

use alloc::vec::Vec;

use log::{debug, warn};

use crate::{ChangeSink, ItemRef, ListError, NoopSink, SegmentLayout};

/// Rejects a logical position that is outside its segment, with a diagnostic.
fn out_of_range(what: &str, position: usize, len: usize) -> ListError {
    warn!("{what} position {position} out of range (segment length {len})");
    ListError::PositionOutOfRange { position, len }
}

/// Clamps an insert position to `[0, len]`, with a diagnostic when it moves.
fn clamp_insert(what: &str, position: usize, len: usize) -> usize {
    if position > len {
        debug!("clamping {what} insert position {position} to {len}");
        len
    } else {
        position
    }
}

/// Shrinks a removal count to what actually remains, with a diagnostic.
fn clamp_removal(what: &str, requested: usize, available: usize) -> usize {
    if requested > available {
        debug!("shrinking {what} removal count from {requested} to {available}");
        available
    } else {
        requested
    }
}

/// A single flat sequence logically partitioned into headers, flat children,
/// groups (each group item followed by its own children), and footers.
///
/// The list owns three things that move in lockstep:
///
/// - the flat storage, a `Vec<T>` that is the single source of truth for
///   physical order;
/// - a [`SegmentLayout`] translating logical positions (per segment) to flat
///   indices and back;
/// - a [`ChangeSink`] that receives exactly one notification per public
///   mutating operation, in flat coordinates.
///
/// Item identity is value-equality (`T: PartialEq`), used for the
/// `remove_*`-by-item and `flat_index_of_*` operations; those are linear
/// scans over the relevant segment window, which is a deliberate contract —
/// segments backing a display are expected to stay small.
///
/// Misuse never panics: invalid positions, empty batches, zero-count
/// removals, and duplicate groups are rejected as no-ops with a [`ListError`]
/// and a `log` diagnostic. Requests that merely overshoot a segment (an
/// insert position past the end, a removal range reaching beyond it) are
/// clamped and proceed; the *clamped* count is what gets applied, reported to
/// the sink, and returned.
///
/// ## Minimal example
///
/// ```rust
/// use strata_list::{ListEvent, SegmentedList};
///
/// let mut list = SegmentedList::with_sink(Vec::<ListEvent>::new());
/// list.push_header("banner");
/// list.push_child("loose row");
/// let g = list.push_group("section").unwrap();
/// list.push_group_child(g, "row in section").unwrap();
/// list.push_footer("load more");
///
/// assert_eq!(list.len(), 5);
/// assert_eq!(list.flat_of_group(g), Some(2));
/// assert_eq!(
///     list.sink().last(),
///     Some(&ListEvent::Inserted { start: 4, count: 1 })
/// );
/// ```
#[derive(Clone, Debug)]
pub struct SegmentedList<T, S = NoopSink> {
    items: Vec<T>,
    layout: SegmentLayout,
    sink: S,
}

impl<T> SegmentedList<T> {
    /// Creates an empty list whose notifications are discarded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(NoopSink)
    }
}

impl<T> Default for SegmentedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: ChangeSink> SegmentedList<T, S> {
    /// Creates an empty list that notifies `sink` of every mutation.
    #[must_use]
    pub fn with_sink(sink: S) -> Self {
        Self {
            items: Vec::new(),
            layout: SegmentLayout::new(),
            sink,
        }
    }

    /// Returns a shared reference to the notification sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns a mutable reference to the notification sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the list and returns the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Returns the position translator for this list.
    #[must_use]
    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    /// Total number of items across all segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if every segment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at flat index `flat`.
    #[must_use]
    pub fn item(&self, flat: usize) -> Option<&T> {
        self.items.get(flat)
    }

    /// The whole flat sequence as a borrowed slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates the flat sequence in order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Resolves a flat index to its segment and logical position.
    #[must_use]
    pub fn locate(&self, flat: usize) -> Option<ItemRef> {
        self.layout.locate(flat)
    }

    fn check(&self) {
        debug_assert!(
            self.layout.is_consistent(self.items.len()),
            "segment counts out of sync with flat storage"
        );
    }

    /// Validates `group` and returns its flat window start and child count.
    fn group_window(&self, group: usize) -> Result<(usize, usize), ListError> {
        match (
            self.layout.group_flat(group),
            self.layout.group_child_count(group),
        ) {
            (Some(start), Some(children)) => Ok((start, children)),
            _ => Err(out_of_range("group", group, self.layout.group_count())),
        }
    }

    // --- headers -----------------------------------------------------------

    /// Appends a header, returning its header position.
    pub fn push_header(&mut self, header: T) -> usize {
        self.insert_header(self.layout.header_count(), header)
    }

    /// Inserts a header at `position`, clamped to `[0, header_count]`.
    ///
    /// Returns the (possibly clamped) position actually used.
    pub fn insert_header(&mut self, position: usize, header: T) -> usize {
        let position = clamp_insert("header", position, self.layout.header_count());
        self.items.insert(position, header);
        self.layout.add_headers(1);
        self.check();
        self.sink.items_inserted(position, 1);
        position
    }

    /// Appends a batch of headers; rejects an empty batch.
    pub fn push_headers(&mut self, headers: Vec<T>) -> Result<usize, ListError> {
        self.insert_headers(self.layout.header_count(), headers)
    }

    /// Inserts a batch of headers at `position` (clamped), preserving their
    /// relative order.
    ///
    /// Emits a single insertion notification covering the whole batch.
    pub fn insert_headers(&mut self, position: usize, headers: Vec<T>) -> Result<usize, ListError> {
        if headers.is_empty() {
            warn!("rejecting empty header batch");
            return Err(ListError::EmptyBatch);
        }
        let position = clamp_insert("header", position, self.layout.header_count());
        let count = headers.len();
        self.items.splice(position..position, headers);
        self.layout.add_headers(count);
        self.check();
        self.sink.items_inserted(position, count);
        Ok(position)
    }

    /// Removes the first header equal to `header`, returning the flat index
    /// it occupied.
    pub fn remove_header(&mut self, header: &T) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        let flat = self.flat_index_of_header(header).ok_or_else(|| {
            warn!("no equal header to remove");
            ListError::NotFound
        })?;
        self.items.remove(flat);
        self.layout.remove_headers(1);
        self.check();
        self.sink.item_removed(flat);
        Ok(flat)
    }

    /// Removes each listed header by identity; absent ones are skipped.
    ///
    /// Returns how many were removed. Each removal emits its own
    /// notification.
    pub fn remove_headers(&mut self, headers: &[T]) -> usize
    where
        T: PartialEq,
    {
        headers
            .iter()
            .filter(|h| self.remove_header(h).is_ok())
            .count()
    }

    /// Removes the header at `position`.
    pub fn remove_header_at(&mut self, position: usize) -> Result<(), ListError> {
        self.remove_headers_at(position, 1).map(|_| ())
    }

    /// Removes up to `count` headers starting at `begin`.
    ///
    /// `begin` must be a valid header position and `count` non-zero; the
    /// count is shrunk to what remains in the segment. Returns the number
    /// actually removed, which is also what the notification reports.
    pub fn remove_headers_at(&mut self, begin: usize, count: usize) -> Result<usize, ListError> {
        let len = self.layout.header_count();
        if begin >= len {
            return Err(out_of_range("header", begin, len));
        }
        if count == 0 {
            warn!("rejecting zero-count header removal");
            return Err(ListError::ZeroCount);
        }
        let actual = clamp_removal("header", count, len - begin);
        self.items.drain(begin..begin + actual);
        self.layout.remove_headers(actual);
        self.check();
        self.sink.items_removed(begin, actual);
        Ok(actual)
    }

    /// Removes all headers. Returns the number removed; a no-op when there
    /// are none.
    pub fn clear_headers(&mut self) -> usize {
        let len = self.layout.header_count();
        if len == 0 {
            return 0;
        }
        self.remove_headers_at(0, len).unwrap_or(0)
    }

    /// Removes all headers from `begin` to the end of the segment.
    pub fn clear_headers_from(&mut self, begin: usize) -> usize {
        let len = self.layout.header_count();
        if begin >= len {
            return 0;
        }
        self.remove_headers_at(begin, len - begin).unwrap_or(0)
    }

    /// Replaces the header at `position` in place. The position is not
    /// clamped.
    pub fn update_header(&mut self, position: usize, header: T) -> Result<(), ListError> {
        let flat = self
            .layout
            .header_flat(position)
            .ok_or_else(|| out_of_range("header", position, self.layout.header_count()))?;
        self.items[flat] = header;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Tells the sink the header at `position` changed, without mutating it.
    pub fn mark_header_changed(&mut self, position: usize) -> Result<(), ListError> {
        let flat = self
            .layout
            .header_flat(position)
            .ok_or_else(|| out_of_range("header", position, self.layout.header_count()))?;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Returns the header at `position`.
    #[must_use]
    pub fn header(&self, position: usize) -> Option<&T> {
        self.layout.header_flat(position).map(|flat| &self.items[flat])
    }

    /// Snapshot of all headers. Later mutation does not affect the returned
    /// copy.
    #[must_use]
    pub fn headers(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items[..self.layout.header_count()].to_vec()
    }

    /// Number of headers.
    #[must_use]
    pub fn header_count(&self) -> usize {
        self.layout.header_count()
    }

    /// Flat index of the header at `position`.
    #[must_use]
    pub fn flat_of_header(&self, position: usize) -> Option<usize> {
        self.layout.header_flat(position)
    }

    /// Flat index of the first header equal to `header`.
    #[must_use]
    pub fn flat_index_of_header(&self, header: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items[..self.layout.header_count()]
            .iter()
            .position(|item| item == header)
    }

    // --- flat children -----------------------------------------------------

    /// Appends a flat child, returning its child position.
    pub fn push_child(&mut self, child: T) -> usize {
        self.insert_child(self.layout.child_count(), child)
    }

    /// Inserts a flat child at `position`, clamped to `[0, child_count]`.
    pub fn insert_child(&mut self, position: usize, child: T) -> usize {
        let position = clamp_insert("child", position, self.layout.child_count());
        let flat = self.layout.header_count() + position;
        self.items.insert(flat, child);
        self.layout.add_children(1);
        self.check();
        self.sink.items_inserted(flat, 1);
        position
    }

    /// Appends a batch of flat children; rejects an empty batch.
    pub fn push_children(&mut self, children: Vec<T>) -> Result<usize, ListError> {
        self.insert_children(self.layout.child_count(), children)
    }

    /// Inserts a batch of flat children at `position` (clamped), preserving
    /// their relative order.
    pub fn insert_children(&mut self, position: usize, children: Vec<T>) -> Result<usize, ListError> {
        if children.is_empty() {
            warn!("rejecting empty child batch");
            return Err(ListError::EmptyBatch);
        }
        let position = clamp_insert("child", position, self.layout.child_count());
        let flat = self.layout.header_count() + position;
        let count = children.len();
        self.items.splice(flat..flat, children);
        self.layout.add_children(count);
        self.check();
        self.sink.items_inserted(flat, count);
        Ok(position)
    }

    /// Removes the first flat child equal to `child`, returning the flat
    /// index it occupied.
    pub fn remove_child(&mut self, child: &T) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        let flat = self.flat_index_of_child(child).ok_or_else(|| {
            warn!("no equal child to remove");
            ListError::NotFound
        })?;
        self.items.remove(flat);
        self.layout.remove_children(1);
        self.check();
        self.sink.item_removed(flat);
        Ok(flat)
    }

    /// Removes each listed flat child by identity; absent ones are skipped.
    pub fn remove_children(&mut self, children: &[T]) -> usize
    where
        T: PartialEq,
    {
        children
            .iter()
            .filter(|c| self.remove_child(c).is_ok())
            .count()
    }

    /// Removes the flat child at `position`.
    pub fn remove_child_at(&mut self, position: usize) -> Result<(), ListError> {
        self.remove_children_at(position, 1).map(|_| ())
    }

    /// Removes up to `count` flat children starting at `begin`; the count is
    /// shrunk to what remains. Returns the number actually removed.
    pub fn remove_children_at(&mut self, begin: usize, count: usize) -> Result<usize, ListError> {
        let len = self.layout.child_count();
        if begin >= len {
            return Err(out_of_range("child", begin, len));
        }
        if count == 0 {
            warn!("rejecting zero-count child removal");
            return Err(ListError::ZeroCount);
        }
        let actual = clamp_removal("child", count, len - begin);
        let flat = self.layout.header_count() + begin;
        self.items.drain(flat..flat + actual);
        self.layout.remove_children(actual);
        self.check();
        self.sink.items_removed(flat, actual);
        Ok(actual)
    }

    /// Removes all flat children. Returns the number removed.
    pub fn clear_children(&mut self) -> usize {
        let len = self.layout.child_count();
        if len == 0 {
            return 0;
        }
        self.remove_children_at(0, len).unwrap_or(0)
    }

    /// Removes all flat children from `begin` to the end of the segment.
    pub fn clear_children_from(&mut self, begin: usize) -> usize {
        let len = self.layout.child_count();
        if begin >= len {
            return 0;
        }
        self.remove_children_at(begin, len - begin).unwrap_or(0)
    }

    /// Replaces the flat child at `position` in place.
    pub fn update_child(&mut self, position: usize, child: T) -> Result<(), ListError> {
        let flat = self
            .layout
            .child_flat(position)
            .ok_or_else(|| out_of_range("child", position, self.layout.child_count()))?;
        self.items[flat] = child;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Tells the sink the flat child at `position` changed.
    pub fn mark_child_changed(&mut self, position: usize) -> Result<(), ListError> {
        let flat = self
            .layout
            .child_flat(position)
            .ok_or_else(|| out_of_range("child", position, self.layout.child_count()))?;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Returns the flat child at `position`.
    #[must_use]
    pub fn child(&self, position: usize) -> Option<&T> {
        self.layout.child_flat(position).map(|flat| &self.items[flat])
    }

    /// Snapshot of all flat children.
    #[must_use]
    pub fn children(&self) -> Vec<T>
    where
        T: Clone,
    {
        let start = self.layout.header_count();
        self.items[start..start + self.layout.child_count()].to_vec()
    }

    /// Number of flat children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.layout.child_count()
    }

    /// Flat index of the flat child at `position`.
    #[must_use]
    pub fn flat_of_child(&self, position: usize) -> Option<usize> {
        self.layout.child_flat(position)
    }

    /// Flat index of the first flat child equal to `child`.
    #[must_use]
    pub fn flat_index_of_child(&self, child: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let start = self.layout.header_count();
        let end = start + self.layout.child_count();
        self.items[start..end]
            .iter()
            .position(|item| item == child)
            .map(|offset| start + offset)
    }

    // --- groups ------------------------------------------------------------

    /// Appends a group with no children, returning its group position.
    ///
    /// A group equal to an already present group is rejected: groups must be
    /// distinguishable by value-equality.
    pub fn push_group(&mut self, group: T) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        self.insert_group(self.layout.group_count(), group)
    }

    /// Inserts a group with no children at `position`, clamped to
    /// `[0, group_count]`.
    pub fn insert_group(&mut self, position: usize, group: T) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        if self.flat_index_of_group(&group).is_some() {
            warn!("rejecting duplicate group");
            return Err(ListError::DuplicateGroup);
        }
        let position = clamp_insert("group", position, self.layout.group_count());
        // The slot a group takes at `position` is where that group currently
        // starts, or the end of the block when appending.
        let flat = self
            .layout
            .group_flat(position)
            .unwrap_or_else(|| self.layout.footer_start());
        self.items.insert(flat, group);
        self.layout.insert_group(position);
        self.check();
        self.sink.items_inserted(flat, 1);
        Ok(position)
    }

    /// Removes the group at `position` together with all its children, as
    /// one atomic flat-range deletion.
    ///
    /// Returns the size of the removed window (one group item plus its
    /// children), which is also what the single range notification reports.
    pub fn remove_group_at(&mut self, position: usize) -> Result<usize, ListError> {
        let (start, _) = self.group_window(position)?;
        let window = self.layout.remove_group(position);
        self.items.drain(start..start + window);
        self.check();
        self.sink.items_removed(start, window);
        Ok(window)
    }

    /// Removes the group equal to `group` together with all its children.
    pub fn remove_group(&mut self, group: &T) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        let position = self.group_position_of(group).ok_or_else(|| {
            warn!("no equal group to remove");
            ListError::NotFound
        })?;
        self.remove_group_at(position)
    }

    /// Removes each listed group by identity; absent ones are skipped.
    pub fn remove_groups(&mut self, groups: &[T]) -> usize
    where
        T: PartialEq,
    {
        groups
            .iter()
            .filter(|g| self.remove_group(g).is_ok())
            .count()
    }

    /// Removes every group and its children, one range notification per
    /// group. Returns the number of groups removed.
    pub fn clear_groups(&mut self) -> usize {
        let count = self.layout.group_count();
        for _ in 0..count {
            // Group 0 shifts down after each removal.
            let _ = self.remove_group_at(0);
        }
        count
    }

    /// Returns the group item at group `position`.
    #[must_use]
    pub fn group(&self, position: usize) -> Option<&T> {
        self.layout.group_flat(position).map(|flat| &self.items[flat])
    }

    /// Snapshot of all group items (children excluded).
    #[must_use]
    pub fn groups(&self) -> Vec<T>
    where
        T: Clone,
    {
        (0..self.layout.group_count())
            .filter_map(|g| self.group(g).cloned())
            .collect()
    }

    /// Replaces the group item at `position` in place. Its children are
    /// untouched.
    pub fn update_group(&mut self, position: usize, group: T) -> Result<(), ListError> {
        let (flat, _) = self.group_window(position)?;
        self.items[flat] = group;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Tells the sink the group item at `position` changed.
    pub fn mark_group_changed(&mut self, position: usize) -> Result<(), ListError> {
        let (flat, _) = self.group_window(position)?;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Tells the sink every child of group `position` changed, one
    /// notification per child. Returns how many were reported.
    pub fn mark_group_children_changed(&mut self, position: usize) -> Result<usize, ListError> {
        let (start, children) = self.group_window(position)?;
        for child in 0..children {
            self.sink.item_changed(start + 1 + child);
        }
        Ok(children)
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.layout.group_count()
    }

    /// Number of children of group `position`.
    #[must_use]
    pub fn group_child_count(&self, position: usize) -> Option<usize> {
        self.layout.group_child_count(position)
    }

    /// Combined length of the group block (group items plus group children).
    #[must_use]
    pub fn group_block_len(&self) -> usize {
        self.layout.group_block_len()
    }

    /// Flat index of the group item at `position`.
    #[must_use]
    pub fn flat_of_group(&self, position: usize) -> Option<usize> {
        self.layout.group_flat(position)
    }

    /// Flat index of the first group item equal to `group`.
    ///
    /// Only group item slots are probed; children are skipped.
    #[must_use]
    pub fn flat_index_of_group(&self, group: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        (0..self.layout.group_count()).find_map(|g| {
            let flat = self.layout.group_flat(g)?;
            (self.items[flat] == *group).then_some(flat)
        })
    }

    /// Group position of the first group item equal to `group`.
    #[must_use]
    pub fn group_position_of(&self, group: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        (0..self.layout.group_count()).find(|&g| {
            self.layout
                .group_flat(g)
                .is_some_and(|flat| self.items[flat] == *group)
        })
    }

    // --- group children ----------------------------------------------------

    /// Appends a child to group `group`, returning its child position.
    pub fn push_group_child(&mut self, group: usize, child: T) -> Result<usize, ListError> {
        let (_, children) = self.group_window(group)?;
        self.insert_group_child(group, children, child)
    }

    /// Inserts a child into group `group` at `position`, clamped to the
    /// group's current child count.
    pub fn insert_group_child(
        &mut self,
        group: usize,
        position: usize,
        child: T,
    ) -> Result<usize, ListError> {
        let (start, children) = self.group_window(group)?;
        let position = clamp_insert("group child", position, children);
        let flat = start + 1 + position;
        self.items.insert(flat, child);
        self.layout.add_group_children(group, 1);
        self.check();
        self.sink.items_inserted(flat, 1);
        Ok(position)
    }

    /// Appends a batch of children to group `group`; rejects an empty batch.
    pub fn push_group_children(&mut self, group: usize, children: Vec<T>) -> Result<usize, ListError> {
        let (_, count) = self.group_window(group)?;
        self.insert_group_children(group, count, children)
    }

    /// Inserts a batch of children into group `group` at `position`
    /// (clamped), preserving their relative order.
    pub fn insert_group_children(
        &mut self,
        group: usize,
        position: usize,
        batch: Vec<T>,
    ) -> Result<usize, ListError> {
        let (start, children) = self.group_window(group)?;
        if batch.is_empty() {
            warn!("rejecting empty group child batch");
            return Err(ListError::EmptyBatch);
        }
        let position = clamp_insert("group child", position, children);
        let flat = start + 1 + position;
        let count = batch.len();
        self.items.splice(flat..flat, batch);
        self.layout.add_group_children(group, count);
        self.check();
        self.sink.items_inserted(flat, count);
        Ok(position)
    }

    /// Removes the first group child equal to `child` from whichever group
    /// holds it, returning `(group, child)` positions it occupied.
    ///
    /// Only child slots are probed; group items are skipped.
    pub fn remove_group_child(&mut self, child: &T) -> Result<(usize, usize), ListError>
    where
        T: PartialEq,
    {
        let (group, position) = self.group_child_position_of(child).ok_or_else(|| {
            warn!("no equal group child to remove");
            ListError::NotFound
        })?;
        self.remove_group_children_at(group, position, 1)?;
        Ok((group, position))
    }

    /// Removes the child at `position` of group `group`.
    pub fn remove_group_child_at(&mut self, group: usize, position: usize) -> Result<(), ListError> {
        self.remove_group_children_at(group, position, 1).map(|_| ())
    }

    /// Removes up to `count` children of group `group` starting at `begin`;
    /// the count is shrunk to what remains in the group. Returns the number
    /// actually removed.
    pub fn remove_group_children_at(
        &mut self,
        group: usize,
        begin: usize,
        count: usize,
    ) -> Result<usize, ListError> {
        let (start, children) = self.group_window(group)?;
        if begin >= children {
            return Err(out_of_range("group child", begin, children));
        }
        if count == 0 {
            warn!("rejecting zero-count group child removal");
            return Err(ListError::ZeroCount);
        }
        let actual = clamp_removal("group child", count, children - begin);
        let flat = start + 1 + begin;
        self.items.drain(flat..flat + actual);
        self.layout.remove_group_children(group, actual);
        self.check();
        self.sink.items_removed(flat, actual);
        Ok(actual)
    }

    /// Removes all children of group `group`, keeping the group item.
    /// Returns the number removed; a no-op when the group has none.
    pub fn clear_group_children(&mut self, group: usize) -> Result<usize, ListError> {
        let (_, children) = self.group_window(group)?;
        if children == 0 {
            return Ok(0);
        }
        self.remove_group_children_at(group, 0, children)
    }

    /// Removes the children of group `group` from `begin` to the end of its
    /// child run.
    pub fn clear_group_children_from(&mut self, group: usize, begin: usize) -> Result<usize, ListError> {
        let (_, children) = self.group_window(group)?;
        if begin >= children {
            return Ok(0);
        }
        self.remove_group_children_at(group, begin, children - begin)
    }

    /// Replaces the child at `position` of group `group` in place.
    pub fn update_group_child(
        &mut self,
        group: usize,
        position: usize,
        child: T,
    ) -> Result<(), ListError> {
        let flat = self.group_child_flat_checked(group, position)?;
        self.items[flat] = child;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Tells the sink the child at `position` of group `group` changed.
    pub fn mark_group_child_changed(&mut self, group: usize, position: usize) -> Result<(), ListError> {
        let flat = self.group_child_flat_checked(group, position)?;
        self.sink.item_changed(flat);
        Ok(())
    }

    fn group_child_flat_checked(&self, group: usize, position: usize) -> Result<usize, ListError> {
        let (_, children) = self.group_window(group)?;
        self.layout
            .group_child_flat(group, position)
            .ok_or_else(|| out_of_range("group child", position, children))
    }

    /// Returns the child at `position` of group `group`.
    #[must_use]
    pub fn group_child(&self, group: usize, position: usize) -> Option<&T> {
        self.layout
            .group_child_flat(group, position)
            .map(|flat| &self.items[flat])
    }

    /// Snapshot of the children of group `group`; empty when the group does
    /// not exist or has none.
    #[must_use]
    pub fn group_children(&self, group: usize) -> Vec<T>
    where
        T: Clone,
    {
        match self.group_window(group) {
            Ok((start, children)) => self.items[start + 1..start + 1 + children].to_vec(),
            Err(_) => Vec::new(),
        }
    }

    /// Flat index of the child at `position` of group `group`.
    #[must_use]
    pub fn flat_of_group_child(&self, group: usize, position: usize) -> Option<usize> {
        self.layout.group_child_flat(group, position)
    }

    /// `(group, child)` positions of the first group child equal to `child`.
    #[must_use]
    pub fn group_child_position_of(&self, child: &T) -> Option<(usize, usize)>
    where
        T: PartialEq,
    {
        for group in 0..self.layout.group_count() {
            let start = self.layout.group_flat(group)?;
            let children = self.layout.group_child_count(group)?;
            for position in 0..children {
                if self.items[start + 1 + position] == *child {
                    return Some((group, position));
                }
            }
        }
        None
    }

    // --- footers -----------------------------------------------------------

    /// Appends a footer, returning its footer position.
    pub fn push_footer(&mut self, footer: T) -> usize {
        self.insert_footer(self.layout.footer_count(), footer)
    }

    /// Inserts a footer at `position`, clamped to `[0, footer_count]`.
    pub fn insert_footer(&mut self, position: usize, footer: T) -> usize {
        let position = clamp_insert("footer", position, self.layout.footer_count());
        let flat = self.layout.footer_start() + position;
        self.items.insert(flat, footer);
        self.layout.add_footers(1);
        self.check();
        self.sink.items_inserted(flat, 1);
        position
    }

    /// Appends a batch of footers; rejects an empty batch.
    pub fn push_footers(&mut self, footers: Vec<T>) -> Result<usize, ListError> {
        self.insert_footers(self.layout.footer_count(), footers)
    }

    /// Inserts a batch of footers at `position` (clamped), preserving their
    /// relative order.
    pub fn insert_footers(&mut self, position: usize, footers: Vec<T>) -> Result<usize, ListError> {
        if footers.is_empty() {
            warn!("rejecting empty footer batch");
            return Err(ListError::EmptyBatch);
        }
        let position = clamp_insert("footer", position, self.layout.footer_count());
        let flat = self.layout.footer_start() + position;
        let count = footers.len();
        self.items.splice(flat..flat, footers);
        self.layout.add_footers(count);
        self.check();
        self.sink.items_inserted(flat, count);
        Ok(position)
    }

    /// Removes the first footer equal to `footer`, returning the flat index
    /// it occupied.
    pub fn remove_footer(&mut self, footer: &T) -> Result<usize, ListError>
    where
        T: PartialEq,
    {
        let flat = self.flat_index_of_footer(footer).ok_or_else(|| {
            warn!("no equal footer to remove");
            ListError::NotFound
        })?;
        self.items.remove(flat);
        self.layout.remove_footers(1);
        self.check();
        self.sink.item_removed(flat);
        Ok(flat)
    }

    /// Removes each listed footer by identity; absent ones are skipped.
    pub fn remove_footers(&mut self, footers: &[T]) -> usize
    where
        T: PartialEq,
    {
        footers
            .iter()
            .filter(|f| self.remove_footer(f).is_ok())
            .count()
    }

    /// Removes the footer at `position`.
    pub fn remove_footer_at(&mut self, position: usize) -> Result<(), ListError> {
        self.remove_footers_at(position, 1).map(|_| ())
    }

    /// Removes up to `count` footers starting at `begin`; the count is
    /// shrunk to what remains. Returns the number actually removed.
    pub fn remove_footers_at(&mut self, begin: usize, count: usize) -> Result<usize, ListError> {
        let len = self.layout.footer_count();
        if begin >= len {
            return Err(out_of_range("footer", begin, len));
        }
        if count == 0 {
            warn!("rejecting zero-count footer removal");
            return Err(ListError::ZeroCount);
        }
        let actual = clamp_removal("footer", count, len - begin);
        let flat = self.layout.footer_start() + begin;
        self.items.drain(flat..flat + actual);
        self.layout.remove_footers(actual);
        self.check();
        self.sink.items_removed(flat, actual);
        Ok(actual)
    }

    /// Removes all footers. Returns the number removed.
    pub fn clear_footers(&mut self) -> usize {
        let len = self.layout.footer_count();
        if len == 0 {
            return 0;
        }
        self.remove_footers_at(0, len).unwrap_or(0)
    }

    /// Removes all footers from `begin` to the end of the segment.
    pub fn clear_footers_from(&mut self, begin: usize) -> usize {
        let len = self.layout.footer_count();
        if begin >= len {
            return 0;
        }
        self.remove_footers_at(begin, len - begin).unwrap_or(0)
    }

    /// Replaces the footer at `position` in place.
    pub fn update_footer(&mut self, position: usize, footer: T) -> Result<(), ListError> {
        let flat = self
            .layout
            .footer_flat(position)
            .ok_or_else(|| out_of_range("footer", position, self.layout.footer_count()))?;
        self.items[flat] = footer;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Tells the sink the footer at `position` changed.
    pub fn mark_footer_changed(&mut self, position: usize) -> Result<(), ListError> {
        let flat = self
            .layout
            .footer_flat(position)
            .ok_or_else(|| out_of_range("footer", position, self.layout.footer_count()))?;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Returns the footer at `position`.
    #[must_use]
    pub fn footer(&self, position: usize) -> Option<&T> {
        self.layout.footer_flat(position).map(|flat| &self.items[flat])
    }

    /// Snapshot of all footers.
    #[must_use]
    pub fn footers(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items[self.layout.footer_start()..].to_vec()
    }

    /// Number of footers.
    #[must_use]
    pub fn footer_count(&self) -> usize {
        self.layout.footer_count()
    }

    /// Flat index of the footer at `position`.
    #[must_use]
    pub fn flat_of_footer(&self, position: usize) -> Option<usize> {
        self.layout.footer_flat(position)
    }

    /// Flat index of the first footer equal to `footer`.
    #[must_use]
    pub fn flat_index_of_footer(&self, footer: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let start = self.layout.footer_start();
        self.items[start..]
            .iter()
            .position(|item| item == footer)
            .map(|offset| start + offset)
    }

    // --- whole-collection operations ---------------------------------------

    /// Flat index of the first item anywhere equal to `item`.
    #[must_use]
    pub fn flat_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|i| i == item)
    }

    /// Swaps the items at two flat indices. Segment counts are unchanged, so
    /// both slots keep their segment membership.
    pub fn swap(&mut self, from: usize, to: usize) -> Result<(), ListError> {
        let len = self.items.len();
        if from >= len {
            return Err(out_of_range("item", from, len));
        }
        if to >= len {
            return Err(out_of_range("item", to, len));
        }
        self.items.swap(from, to);
        self.sink.item_moved(from, to);
        Ok(())
    }

    /// Replaces the item at flat index `flat` in place, whatever segment it
    /// belongs to.
    pub fn update_item(&mut self, flat: usize, item: T) -> Result<(), ListError> {
        let len = self.items.len();
        if flat >= len {
            return Err(out_of_range("item", flat, len));
        }
        self.items[flat] = item;
        self.sink.item_changed(flat);
        Ok(())
    }

    /// Removes the item at flat index `flat`, dispatching on its segment.
    ///
    /// Headers, flat children, and footers are removed alone. A group item
    /// slot removes the whole group with its children (one range
    /// notification); a group child slot removes just that child.
    pub fn remove_item(&mut self, flat: usize) -> Result<(), ListError> {
        let location = self
            .layout
            .locate(flat)
            .ok_or_else(|| out_of_range("item", flat, self.items.len()))?;
        match location {
            ItemRef::Header(_) => {
                self.items.remove(flat);
                self.layout.remove_headers(1);
                self.check();
                self.sink.item_removed(flat);
            }
            ItemRef::Child(_) => {
                self.items.remove(flat);
                self.layout.remove_children(1);
                self.check();
                self.sink.item_removed(flat);
            }
            ItemRef::Group(group) => {
                self.remove_group_at(group)?;
            }
            ItemRef::GroupChild { group, child } => {
                self.remove_group_children_at(group, child, 1)?;
            }
            ItemRef::Footer(_) => {
                self.items.remove(flat);
                self.layout.remove_footers(1);
                self.check();
                self.sink.item_removed(flat);
            }
        }
        Ok(())
    }

    /// Resets the collection to empty: storage and every count, atomically.
    ///
    /// Always emits a single full-reset notification, even when the list was
    /// already empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.layout.clear();
        self.check();
        self.sink.reset();
    }
}

impl<'a, T, S: ChangeSink> IntoIterator for &'a SegmentedList<T, S> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
