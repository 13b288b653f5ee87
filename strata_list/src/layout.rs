// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment count bookkeeping and logical↔flat position translation.

use smallvec::SmallVec;

use crate::ItemRef;

/// Count state and position translator for a segmented flat sequence.
///
/// The layout knows how many items each segment holds and where each segment
/// starts, but never touches the items themselves; the owning
/// [`SegmentedList`](crate::SegmentedList) keeps the two in lockstep. All
/// forward conversions are total over their declared domain and return
/// `None` for out-of-domain input.
///
/// Segments occupy the flat sequence back to back, in this fixed order:
///
/// ```text
/// [headers][children][g0, g0 children…, g1, g1 children…, …][footers]
/// ```
///
/// Within the group block, each group item occupies exactly one slot,
/// immediately followed by that group's children with no gaps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentLayout {
    headers: usize,
    children: usize,
    /// Per-group child counts, index-aligned with groups in flat order.
    group_children: SmallVec<[usize; 8]>,
    /// Derived: Σ (1 + group_children[i]). Maintained on every group mutation.
    group_block: usize,
    footers: usize,
}

impl SegmentLayout {
    /// Creates an empty layout with all counts zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of flat slots described by this layout.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers + self.children + self.group_block + self.footers
    }

    /// Returns `true` if every segment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of headers.
    #[must_use]
    pub fn header_count(&self) -> usize {
        self.headers
    }

    /// Number of flat (ungrouped) children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_children.len()
    }

    /// Number of children of group `group`, or `None` if the group does not
    /// exist.
    #[must_use]
    pub fn group_child_count(&self, group: usize) -> Option<usize> {
        self.group_children.get(group).copied()
    }

    /// Combined length of the group block: every group item plus every
    /// group child.
    #[must_use]
    pub fn group_block_len(&self) -> usize {
        self.group_block
    }

    /// Number of footers.
    #[must_use]
    pub fn footer_count(&self) -> usize {
        self.footers
    }

    /// Flat index where the group block begins (even when it is empty).
    #[must_use]
    pub fn group_block_start(&self) -> usize {
        self.headers + self.children
    }

    /// Flat index where the footer region begins (even when it is empty).
    #[must_use]
    pub fn footer_start(&self) -> usize {
        self.headers + self.children + self.group_block
    }

    /// Flat index of header `header`, or `None` if out of range.
    #[must_use]
    pub fn header_flat(&self, header: usize) -> Option<usize> {
        (header < self.headers).then_some(header)
    }

    /// Flat index of flat child `child`, or `None` if out of range.
    #[must_use]
    pub fn child_flat(&self, child: usize) -> Option<usize> {
        (child < self.children).then_some(self.headers + child)
    }

    /// Flat index of the group item of group `group`, or `None` if out of
    /// range.
    #[must_use]
    pub fn group_flat(&self, group: usize) -> Option<usize> {
        if group >= self.group_children.len() {
            return None;
        }
        let within_block: usize = self.group_children[..group].iter().map(|c| c + 1).sum();
        Some(self.group_block_start() + within_block)
    }

    /// Flat index of child `child` of group `group`, or `None` if either
    /// coordinate is out of range.
    #[must_use]
    pub fn group_child_flat(&self, group: usize, child: usize) -> Option<usize> {
        if child >= self.group_child_count(group)? {
            return None;
        }
        // group_flat already validated `group`.
        self.group_flat(group).map(|flat| flat + 1 + child)
    }

    /// Flat index of footer `footer`, or `None` if out of range.
    #[must_use]
    pub fn footer_flat(&self, footer: usize) -> Option<usize> {
        (footer < self.footers).then_some(self.footer_start() + footer)
    }

    /// Resolves a flat index back to its segment and logical position.
    ///
    /// Returns `None` when `flat` is at or past [`SegmentLayout::len`]. For
    /// indices inside the group block, the result distinguishes a group item
    /// from a child of that group.
    #[must_use]
    pub fn locate(&self, flat: usize) -> Option<ItemRef> {
        if flat >= self.len() {
            return None;
        }
        if flat < self.headers {
            return Some(ItemRef::Header(flat));
        }
        if flat < self.group_block_start() {
            return Some(ItemRef::Child(flat - self.headers));
        }
        if flat < self.footer_start() {
            // Walk each group's window [start, start + 1 + child_count).
            let mut start = self.group_block_start();
            for (group, &child_count) in self.group_children.iter().enumerate() {
                if flat == start {
                    return Some(ItemRef::Group(group));
                }
                if flat <= start + child_count {
                    return Some(ItemRef::GroupChild {
                        group,
                        child: flat - start - 1,
                    });
                }
                start += 1 + child_count;
            }
            // The walk covers every index below footer_start whenever the
            // derived block total is in sync with the per-group counts.
            debug_assert!(false, "group block walk missed flat index {flat}");
            return None;
        }
        Some(ItemRef::Footer(flat - self.footer_start()))
    }

    /// Returns `true` if the counts are mutually consistent and describe
    /// exactly `flat_len` slots.
    #[must_use]
    pub fn is_consistent(&self, flat_len: usize) -> bool {
        let derived: usize = self.group_children.iter().map(|c| c + 1).sum();
        derived == self.group_block && self.len() == flat_len
    }

    pub(crate) fn add_headers(&mut self, count: usize) {
        self.headers += count;
    }

    pub(crate) fn remove_headers(&mut self, count: usize) {
        debug_assert!(count <= self.headers, "removing more headers than exist");
        self.headers -= count;
    }

    pub(crate) fn add_children(&mut self, count: usize) {
        self.children += count;
    }

    pub(crate) fn remove_children(&mut self, count: usize) {
        debug_assert!(count <= self.children, "removing more children than exist");
        self.children -= count;
    }

    /// Registers a new, empty group at group position `group`.
    pub(crate) fn insert_group(&mut self, group: usize) {
        debug_assert!(group <= self.group_children.len(), "group position gap");
        self.group_children.insert(group, 0);
        self.group_block += 1;
    }

    /// Unregisters group `group`, returning the size of its flat window
    /// (the group item plus all its children).
    pub(crate) fn remove_group(&mut self, group: usize) -> usize {
        let children = self.group_children.remove(group);
        let window = 1 + children;
        self.group_block -= window;
        window
    }

    pub(crate) fn add_group_children(&mut self, group: usize, count: usize) {
        self.group_children[group] += count;
        self.group_block += count;
    }

    pub(crate) fn remove_group_children(&mut self, group: usize, count: usize) {
        debug_assert!(
            count <= self.group_children[group],
            "removing more group children than exist"
        );
        self.group_children[group] -= count;
        self.group_block -= count;
    }

    pub(crate) fn add_footers(&mut self, count: usize) {
        self.footers += count;
    }

    pub(crate) fn remove_footers(&mut self, count: usize) {
        debug_assert!(count <= self.footers, "removing more footers than exist");
        self.footers -= count;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::SegmentLayout;
    use crate::ItemRef;

    fn sample() -> SegmentLayout {
        // 2 headers, 3 children, groups of 2 and 0 children, 1 footer:
        // [H H | C C C | G0 gc gc G1 | F]
        let mut layout = SegmentLayout::new();
        layout.add_headers(2);
        layout.add_children(3);
        layout.insert_group(0);
        layout.add_group_children(0, 2);
        layout.insert_group(1);
        layout.add_footers(1);
        layout
    }

    #[test]
    fn forward_conversions_follow_segment_order() {
        let layout = sample();
        assert_eq!(layout.len(), 10);
        assert_eq!(layout.header_flat(0), Some(0));
        assert_eq!(layout.header_flat(1), Some(1));
        assert_eq!(layout.header_flat(2), None);
        assert_eq!(layout.child_flat(0), Some(2));
        assert_eq!(layout.child_flat(2), Some(4));
        assert_eq!(layout.child_flat(3), None);
        assert_eq!(layout.group_flat(0), Some(5));
        assert_eq!(layout.group_child_flat(0, 0), Some(6));
        assert_eq!(layout.group_child_flat(0, 1), Some(7));
        assert_eq!(layout.group_child_flat(0, 2), None);
        assert_eq!(layout.group_flat(1), Some(8));
        assert_eq!(layout.group_child_flat(1, 0), None);
        assert_eq!(layout.group_flat(2), None);
        assert_eq!(layout.footer_flat(0), Some(9));
        assert_eq!(layout.footer_flat(1), None);
    }

    #[test]
    fn adjacent_group_starts_differ_by_window_size() {
        let layout = sample();
        let g0 = layout.group_flat(0).unwrap();
        let g1 = layout.group_flat(1).unwrap();
        assert_eq!(g1, g0 + 3);
        assert_eq!(layout.group_block_len(), 4);
    }

    #[test]
    fn locate_inverts_every_forward_conversion() {
        let layout = sample();
        for h in 0..layout.header_count() {
            assert_eq!(
                layout.locate(layout.header_flat(h).unwrap()),
                Some(ItemRef::Header(h))
            );
        }
        for c in 0..layout.child_count() {
            assert_eq!(
                layout.locate(layout.child_flat(c).unwrap()),
                Some(ItemRef::Child(c))
            );
        }
        for g in 0..layout.group_count() {
            assert_eq!(
                layout.locate(layout.group_flat(g).unwrap()),
                Some(ItemRef::Group(g))
            );
            for c in 0..layout.group_child_count(g).unwrap() {
                assert_eq!(
                    layout.locate(layout.group_child_flat(g, c).unwrap()),
                    Some(ItemRef::GroupChild { group: g, child: c })
                );
            }
        }
        for f in 0..layout.footer_count() {
            assert_eq!(
                layout.locate(layout.footer_flat(f).unwrap()),
                Some(ItemRef::Footer(f))
            );
        }
        assert_eq!(layout.locate(layout.len()), None);
    }

    #[test]
    fn empty_layout_resolves_nothing() {
        let layout = SegmentLayout::new();
        assert!(layout.is_empty());
        assert_eq!(layout.locate(0), None);
        assert_eq!(layout.header_flat(0), None);
        assert_eq!(layout.group_flat(0), None);
        assert_eq!(layout.footer_flat(0), None);
    }

    #[test]
    fn group_removal_reports_window_size_and_shrinks_block() {
        let mut layout = sample();
        assert_eq!(layout.remove_group(0), 3);
        assert_eq!(layout.group_count(), 1);
        assert_eq!(layout.group_block_len(), 1);
        // Former G1 is now group 0 and sits where G0 used to.
        assert_eq!(layout.group_flat(0), Some(5));
        assert!(layout.is_consistent(7));
    }

    #[test]
    fn consistency_check_matches_counts() {
        let layout = sample();
        assert!(layout.is_consistent(10));
        assert!(!layout.is_consistent(9));
    }
}
