// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A grouped feed driven through a recording sink.
//!
//! This example builds the classic feed shape (banner header, pinned rows,
//! collapsible sections, load-more footer), mutates it the way a host app
//! would, and prints the flat sequence next to the change notifications a
//! renderer would consume.
//!
//! Run:
//! - `cargo run -p strata_demos --example grouped_feed`

use strata_list::{ItemRef, ListEvent, Segment, SegmentedList, ViewType, ViewTypeModel};

/// One feed row. Groups are section titles; everything else is a leaf row.
#[derive(Clone, Debug, PartialEq)]
enum Row {
    Banner(&'static str),
    Pinned(&'static str),
    Section(&'static str),
    Story(&'static str),
    LoadMore,
}

const BANNER: ViewType = ViewType(1);
const PINNED: ViewType = ViewType(2);

struct FeedModel;

impl ViewTypeModel<Row> for FeedModel {
    fn classify(&self, item: &Row) -> Option<ViewType> {
        match item {
            Row::Banner(_) => Some(BANNER),
            Row::Pinned(_) => Some(PINNED),
            _ => None,
        }
    }
}

fn dump(list: &SegmentedList<Row, Vec<ListEvent>>) {
    for (flat, row) in list.iter().enumerate() {
        let location = list.locate(flat).expect("every slot resolves");
        let indent = match location {
            ItemRef::GroupChild { .. } => "    ",
            _ => "",
        };
        println!("  [{flat:2}] {indent}{row:?}  <- {location:?}");
    }
}

fn drain_events(list: &mut SegmentedList<Row, Vec<ListEvent>>, label: &str) {
    println!("{label}:");
    for event in list.sink_mut().drain(..) {
        println!("  {event:?}");
    }
}

fn main() {
    let mut list = SegmentedList::with_sink(Vec::new());

    // Initial load: headers first, then two sections with their stories.
    list.push_header(Row::Banner("spring sale"));
    list.push_header(Row::Pinned("welcome back"));
    let news = list.push_group(Row::Section("news")).expect("new section");
    list.push_group_children(
        news,
        vec![Row::Story("headline"), Row::Story("local weather")],
    )
    .expect("stories");
    let sports = list.push_group(Row::Section("sports")).expect("new section");
    list.push_group_child(sports, Row::Story("match report"))
        .expect("story");
    list.push_footer(Row::LoadMore);

    drain_events(&mut list, "initial load");
    println!("feed ({} rows):", list.len());
    dump(&list);

    // The banner expires: drop the first header with view type BANNER.
    let model = FeedModel;
    list.remove_first_by_view_type(&model, Segment::Header, BANNER)
        .expect("banner present");
    drain_events(&mut list, "\nbanner expired");

    // A new story arrives at the top of the news section.
    list.insert_group_child(news, 0, Row::Story("breaking"))
        .expect("news section still present");
    drain_events(&mut list, "\nbreaking news");

    // The whole sports section is dismissed: one atomic range removal.
    list.remove_group(&Row::Section("sports"))
        .expect("sports present");
    drain_events(&mut list, "\nsports dismissed");

    println!("\nfeed after edits ({} rows):", list.len());
    dump(&list);
}
