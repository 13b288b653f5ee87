// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View-type classification and ordering-constraint queries.
//!
//! A host that renders heterogeneous rows assigns each item an integer
//! [`ViewType`] through a [`ViewTypeModel`]. On top of that classification
//! the list answers "where is the first/last item of this type in a segment"
//! and, given a canonical type order, "at which logical position should a new
//! item of this type be inserted so the segment stays sorted by type".

use log::warn;

use crate::{ChangeSink, ListError, Segment, SegmentedList, ViewType};

/// Classifies items into view types.
///
/// [`ViewTypeModel::classify`] decides by item value. Returning `None` defers
/// to [`ViewTypeModel::view_type_at`], the positional fallback, which lets a
/// model type a slot it cannot recognize by value (a placeholder, say) by
/// where it sits. The default positional fallback is `ViewType(0)`.
pub trait ViewTypeModel<T> {
    /// The view type of `item`, or `None` to defer to the positional
    /// fallback.
    fn classify(&self, item: &T) -> Option<ViewType>;

    /// Positional fallback for items [`classify`](Self::classify) declines.
    fn view_type_at(&self, flat: usize) -> ViewType {
        let _ = flat;
        ViewType(0)
    }
}

impl<T, S: ChangeSink> SegmentedList<T, S> {
    fn segment_len(&self, segment: Segment) -> usize {
        match segment {
            Segment::Header => self.header_count(),
            Segment::Child => self.child_count(),
            Segment::Group => self.group_count(),
            Segment::Footer => self.footer_count(),
        }
    }

    fn segment_flat(&self, segment: Segment, position: usize) -> Option<usize> {
        match segment {
            Segment::Header => self.flat_of_header(position),
            Segment::Child => self.flat_of_child(position),
            Segment::Group => self.flat_of_group(position),
            Segment::Footer => self.flat_of_footer(position),
        }
    }

    /// The resolved view type of the item at flat index `flat`, or `None`
    /// when the index is out of range.
    #[must_use]
    pub fn view_type_of<M: ViewTypeModel<T>>(&self, model: &M, flat: usize) -> Option<ViewType> {
        let item = self.item(flat)?;
        Some(model.classify(item).unwrap_or_else(|| model.view_type_at(flat)))
    }

    fn view_type_in_segment<M: ViewTypeModel<T>>(
        &self,
        model: &M,
        segment: Segment,
        position: usize,
    ) -> Option<ViewType> {
        self.view_type_of(model, self.segment_flat(segment, position)?)
    }

    /// Logical position of the first item of `segment` whose resolved view
    /// type is `view_type`.
    ///
    /// The [`Segment::Group`] scan probes group item slots only; children are
    /// never visited.
    #[must_use]
    pub fn first_by_view_type<M: ViewTypeModel<T>>(
        &self,
        model: &M,
        segment: Segment,
        view_type: ViewType,
    ) -> Option<usize> {
        (0..self.segment_len(segment))
            .find(|&p| self.view_type_in_segment(model, segment, p) == Some(view_type))
    }

    /// Logical position of the last item of `segment` whose resolved view
    /// type is `view_type`.
    #[must_use]
    pub fn last_by_view_type<M: ViewTypeModel<T>>(
        &self,
        model: &M,
        segment: Segment,
        view_type: ViewType,
    ) -> Option<usize> {
        (0..self.segment_len(segment))
            .rev()
            .find(|&p| self.view_type_in_segment(model, segment, p) == Some(view_type))
    }

    /// Removes the first item of `segment` whose resolved view type is
    /// `view_type`, returning the logical position it occupied.
    ///
    /// Matching a [`Segment::Group`] slot removes the whole group together
    /// with its children, as one atomic range.
    pub fn remove_first_by_view_type<M: ViewTypeModel<T>>(
        &mut self,
        model: &M,
        segment: Segment,
        view_type: ViewType,
    ) -> Result<usize, ListError> {
        let position = self
            .first_by_view_type(model, segment, view_type)
            .ok_or_else(|| {
                warn!("no {segment:?} item with view type {}", view_type.0);
                ListError::NotFound
            })?;
        match segment {
            Segment::Header => self.remove_headers_at(position, 1)?,
            Segment::Child => self.remove_children_at(position, 1)?,
            Segment::Group => self.remove_group_at(position)?,
            Segment::Footer => self.remove_footers_at(position, 1)?,
        };
        Ok(position)
    }

    /// Logical position at which an item of view type `view_type` should be
    /// inserted into `segment` so that the segment stays ordered by
    /// `canonical`, the host's canonical view-type order for that segment.
    ///
    /// Walks the canonical types that precede `view_type`, nearest first, and
    /// places the new item directly after the last present item of the first
    /// such type found. When no earlier type has any item present the
    /// position is the segment start. An empty `canonical` or a `view_type`
    /// missing from it yields `None`.
    ///
    /// Items of `view_type` itself do not anchor the position, so an insert
    /// at the returned position lands *before* existing items of the same
    /// type.
    #[must_use]
    pub fn ordered_insert_position<M: ViewTypeModel<T>>(
        &self,
        model: &M,
        segment: Segment,
        canonical: &[ViewType],
        view_type: ViewType,
    ) -> Option<usize> {
        if canonical.is_empty() {
            warn!("empty canonical view-type order for {segment:?}");
            return None;
        }
        let Some(rank) = canonical.iter().position(|vt| *vt == view_type) else {
            warn!(
                "view type {} not in the canonical order for {segment:?}",
                view_type.0
            );
            return None;
        };
        if rank == 0 {
            return Some(0);
        }
        for earlier in (0..rank).rev() {
            if let Some(last) = self.last_by_view_type(model, segment, canonical[earlier]) {
                return Some(last + 1);
            }
        }
        Some(0)
    }
}
