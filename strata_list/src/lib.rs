// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=strata_list --heading-base-level=0

//! Strata List: a segmented ordered collection for scrollable list displays.
//!
//! This crate provides a renderer-agnostic core for the common "grouped feed"
//! list shape: a single flat item sequence logically partitioned into four
//! back-to-back segments:
//!
//! ```text
//! [headers][flat children][group, its children…, group, …][footers]
//! ```
//!
//! Hosts mutate the collection through per-segment logical positions
//! ("child 2", "group 1, child 0") while a display consumes one flat,
//! gap-free sequence plus precise change notifications it can feed into view
//! recycling or display-list patching.
//!
//! The core concepts are:
//!
//! - [`SegmentedList`]: the collection itself. Every mutation validates (or
//!   clamps) its arguments, splices the flat storage, updates the segment
//!   counts, and emits exactly one notification describing the net effect.
//! - [`SegmentLayout`]: the count state and position translator. It converts
//!   logical positions to flat indices and, via [`SegmentLayout::locate`],
//!   flat indices back to an [`ItemRef`].
//! - [`ChangeSink`]: the capability set a renderer implements to receive
//!   notifications. [`NoopSink`] discards them and `Vec<`[`ListEvent`]`>`
//!   records them, for polling hosts and for tests respectively.
//! - [`ViewTypeModel`]: integer classification of items into [`ViewType`]s,
//!   powering per-segment type queries and canonical-order insertion via
//!   [`SegmentedList::ordered_insert_position`].
//!
//! This crate deliberately does **not** know about views, measurement, or any
//! particular UI framework. Host frameworks are responsible for:
//!
//! - Owning the renderer and mapping flat indices to realized views.
//! - Translating [`ChangeSink`] calls into their incremental-update scheme.
//! - Deciding what item values and view types mean.
//!
//! ## Minimal example
//!
//! A grouped feed with a banner, a section, and a load-more footer:
//!
//! ```rust
//! use strata_list::{ItemRef, ListEvent, SegmentedList};
//!
//! let mut list = SegmentedList::with_sink(Vec::<ListEvent>::new());
//! list.push_header("banner");
//! let news = list.push_group("news").unwrap();
//! list.push_group_children(news, vec!["headline", "weather"]).unwrap();
//! list.push_footer("load more");
//!
//! // The display sees one flat sequence…
//! assert_eq!(list.as_slice(), &["banner", "news", "headline", "weather", "load more"]);
//! // …and can resolve any flat index back to its logical position.
//! assert_eq!(list.locate(2), Some(ItemRef::GroupChild { group: 0, child: 0 }));
//!
//! // Removing a group takes its children with it, as one recorded range.
//! list.sink_mut().clear();
//! list.remove_group_at(news).unwrap();
//! assert_eq!(list.sink().as_slice(), &[ListEvent::RangeRemoved { start: 1, count: 3 }]);
//! ```
//!
//! Misuse is rejected, never a panic: out-of-range positions, empty batches,
//! and duplicate groups come back as a [`ListError`] and leave the list
//! untouched, while overshooting requests (an insert position past the end of
//! a segment, a removal range reaching beyond it) are clamped and proceed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod layout;
mod list;
mod sink;
mod types;
mod view_type;

pub use error::ListError;
pub use layout::SegmentLayout;
pub use list::SegmentedList;
pub use sink::{ChangeSink, ListEvent, NoopSink};
pub use types::{ItemRef, Segment, ViewType};
pub use view_type::ViewTypeModel;
