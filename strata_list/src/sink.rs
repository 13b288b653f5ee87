// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification sink consumed by the mutation engine.
//!
//! A [`SegmentedList`](crate::SegmentedList) emits exactly one sink call per
//! public mutating operation, describing the net structural effect in flat
//! coordinates. Renderers implement [`ChangeSink`] to translate those calls
//! into whatever incremental-update mechanism they have (view recycling,
//! display-list patching, diffing).

use alloc::vec::Vec;

/// Capability set implemented by the external renderer.
///
/// Indices refer to flat coordinates valid *at the time of the call*:
/// post-mutation for insertions and changes, the pre-mutation reference point
/// for removals. Implementations must not call back into the list; the
/// collection is non-reentrant.
pub trait ChangeSink {
    /// `count` items were inserted starting at flat index `start`.
    fn items_inserted(&mut self, start: usize, count: usize);
    /// The single item at flat index `index` was removed.
    fn item_removed(&mut self, index: usize);
    /// `count` contiguous items starting at flat index `start` were removed.
    fn items_removed(&mut self, start: usize, count: usize);
    /// The item at flat index `index` was replaced or invalidated in place.
    fn item_changed(&mut self, index: usize);
    /// The items at flat indices `from` and `to` swapped places.
    fn item_moved(&mut self, from: usize, to: usize);
    /// The entire collection was reset to empty.
    fn reset(&mut self);
}

/// A sink that discards every notification.
///
/// This is the default sink parameter of
/// [`SegmentedList`](crate::SegmentedList), for hosts that poll the list
/// instead of reacting to changes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoopSink;

impl ChangeSink for NoopSink {
    fn items_inserted(&mut self, _start: usize, _count: usize) {}
    fn item_removed(&mut self, _index: usize) {}
    fn items_removed(&mut self, _start: usize, _count: usize) {}
    fn item_changed(&mut self, _index: usize) {}
    fn item_moved(&mut self, _from: usize, _to: usize) {}
    fn reset(&mut self) {}
}

/// A single recorded change notification.
///
/// See [`ChangeSink`] for the meaning of each variant; `Vec<ListEvent>`
/// implements [`ChangeSink`] and records one event per call, which gives
/// tests and demos a ready-made recording sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    /// Items inserted at `start`.
    Inserted {
        /// Flat index of the first inserted item.
        start: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// Single item removed from `index`.
    Removed {
        /// Flat index the item occupied before removal.
        index: usize,
    },
    /// Contiguous range removed starting at `start`.
    RangeRemoved {
        /// Flat index the range started at before removal.
        start: usize,
        /// Number of removed items.
        count: usize,
    },
    /// Item at `index` changed in place.
    Changed {
        /// Flat index of the changed item.
        index: usize,
    },
    /// Items at `from` and `to` swapped places.
    Moved {
        /// Flat index of the first item.
        from: usize,
        /// Flat index of the second item.
        to: usize,
    },
    /// The collection was reset to empty.
    Reset,
}

impl ChangeSink for Vec<ListEvent> {
    fn items_inserted(&mut self, start: usize, count: usize) {
        self.push(ListEvent::Inserted { start, count });
    }

    fn item_removed(&mut self, index: usize) {
        self.push(ListEvent::Removed { index });
    }

    fn items_removed(&mut self, start: usize, count: usize) {
        self.push(ListEvent::RangeRemoved { start, count });
    }

    fn item_changed(&mut self, index: usize) {
        self.push(ListEvent::Changed { index });
    }

    fn item_moved(&mut self, from: usize, to: usize) {
        self.push(ListEvent::Moved { from, to });
    }

    fn reset(&mut self) {
        self.push(ListEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{ChangeSink, ListEvent, NoopSink};

    #[test]
    fn vec_sink_records_in_call_order() {
        let mut sink: Vec<ListEvent> = Vec::new();
        sink.items_inserted(0, 3);
        sink.item_changed(1);
        sink.items_removed(0, 2);
        sink.item_moved(0, 1);
        sink.item_removed(0);
        sink.reset();

        assert_eq!(
            sink,
            [
                ListEvent::Inserted { start: 0, count: 3 },
                ListEvent::Changed { index: 1 },
                ListEvent::RangeRemoved { start: 0, count: 2 },
                ListEvent::Moved { from: 0, to: 1 },
                ListEvent::Removed { index: 0 },
                ListEvent::Reset,
            ]
        );
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.items_inserted(0, 1);
        sink.reset();
    }
}
