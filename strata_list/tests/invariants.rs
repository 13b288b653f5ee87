// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized consistency tests for the segmented list.
//!
//! Each case applies a random operation sequence both to a [`SegmentedList`]
//! and to a naive mirror that keeps the four segments as separate vectors.
//! After every step the list's flat sequence must equal the mirror's
//! flattening, the segment counts must agree, every flat index must resolve
//! back to itself through `locate`, and the sink must have received exactly
//! one notification per accepted mutation and none per rejected one.

use proptest::prelude::*;

use strata_list::{ItemRef, ListEvent, SegmentedList};

/// The four segments kept separately, with none of the list's bookkeeping.
#[derive(Default, Debug, Clone)]
struct Mirror {
    headers: Vec<u32>,
    children: Vec<u32>,
    groups: Vec<(u32, Vec<u32>)>,
    footers: Vec<u32>,
}

impl Mirror {
    fn flatten(&self) -> Vec<u32> {
        let mut flat = self.headers.clone();
        flat.extend(&self.children);
        for (group, kids) in &self.groups {
            flat.push(*group);
            flat.extend(kids);
        }
        flat.extend(&self.footers);
        flat
    }

    fn len(&self) -> usize {
        self.flatten().len()
    }

    fn slot_mut(&mut self, flat: usize) -> Option<&mut u32> {
        let mut at = flat;
        if at < self.headers.len() {
            return Some(&mut self.headers[at]);
        }
        at -= self.headers.len();
        if at < self.children.len() {
            return Some(&mut self.children[at]);
        }
        at -= self.children.len();
        for (group, kids) in &mut self.groups {
            if at == 0 {
                return Some(group);
            }
            at -= 1;
            if at < kids.len() {
                return Some(&mut kids[at]);
            }
            at -= kids.len();
        }
        self.footers.get_mut(at)
    }

    /// Removes the slot at `flat` the way the list's dispatching removal
    /// does: a group item takes its children with it.
    fn remove_slot(&mut self, flat: usize) -> bool {
        let mut at = flat;
        if at < self.headers.len() {
            self.headers.remove(at);
            return true;
        }
        at -= self.headers.len();
        if at < self.children.len() {
            self.children.remove(at);
            return true;
        }
        at -= self.children.len();
        for g in 0..self.groups.len() {
            if at == 0 {
                self.groups.remove(g);
                return true;
            }
            at -= 1;
            let kids = &mut self.groups[g].1;
            if at < kids.len() {
                kids.remove(at);
                return true;
            }
            at -= kids.len();
        }
        if at < self.footers.len() {
            self.footers.remove(at);
            return true;
        }
        false
    }
}

#[derive(Debug, Clone)]
enum Op {
    InsertHeader(usize, u32),
    InsertHeaders(usize, Vec<u32>),
    RemoveHeader(u32),
    RemoveHeadersAt(usize, usize),
    InsertChild(usize, u32),
    InsertChildren(usize, Vec<u32>),
    RemoveChild(u32),
    RemoveChildrenAt(usize, usize),
    InsertGroup(usize, u32),
    RemoveGroupAt(usize),
    InsertGroupChild(usize, usize, u32),
    InsertGroupChildren(usize, usize, Vec<u32>),
    RemoveGroupChildrenAt(usize, usize, usize),
    InsertFooter(usize, u32),
    RemoveFootersAt(usize, usize),
    Swap(usize, usize),
    UpdateItem(usize, u32),
    RemoveItem(usize),
    Clear,
}

/// Applies `op` to the mirror, duplicating the list's clamping and rejection
/// rules. Returns whether the list is expected to accept the operation.
fn apply_to_mirror(mirror: &mut Mirror, op: &Op) -> bool {
    match op {
        Op::InsertHeader(p, v) => {
            let p = (*p).min(mirror.headers.len());
            mirror.headers.insert(p, *v);
            true
        }
        Op::InsertHeaders(p, vs) => {
            if vs.is_empty() {
                return false;
            }
            let p = (*p).min(mirror.headers.len());
            mirror.headers.splice(p..p, vs.iter().copied());
            true
        }
        Op::RemoveHeader(v) => match mirror.headers.iter().position(|h| h == v) {
            Some(p) => {
                mirror.headers.remove(p);
                true
            }
            None => false,
        },
        Op::RemoveHeadersAt(b, c) => {
            if *b >= mirror.headers.len() || *c == 0 {
                return false;
            }
            let actual = (*c).min(mirror.headers.len() - b);
            mirror.headers.drain(*b..*b + actual);
            true
        }
        Op::InsertChild(p, v) => {
            let p = (*p).min(mirror.children.len());
            mirror.children.insert(p, *v);
            true
        }
        Op::InsertChildren(p, vs) => {
            if vs.is_empty() {
                return false;
            }
            let p = (*p).min(mirror.children.len());
            mirror.children.splice(p..p, vs.iter().copied());
            true
        }
        Op::RemoveChild(v) => match mirror.children.iter().position(|c| c == v) {
            Some(p) => {
                mirror.children.remove(p);
                true
            }
            None => false,
        },
        Op::RemoveChildrenAt(b, c) => {
            if *b >= mirror.children.len() || *c == 0 {
                return false;
            }
            let actual = (*c).min(mirror.children.len() - b);
            mirror.children.drain(*b..*b + actual);
            true
        }
        Op::InsertGroup(p, v) => {
            if mirror.groups.iter().any(|(g, _)| g == v) {
                return false;
            }
            let p = (*p).min(mirror.groups.len());
            mirror.groups.insert(p, (*v, Vec::new()));
            true
        }
        Op::RemoveGroupAt(g) => {
            if *g >= mirror.groups.len() {
                return false;
            }
            mirror.groups.remove(*g);
            true
        }
        Op::InsertGroupChild(g, p, v) => match mirror.groups.get_mut(*g) {
            Some((_, kids)) => {
                let p = (*p).min(kids.len());
                kids.insert(p, *v);
                true
            }
            None => false,
        },
        Op::InsertGroupChildren(g, p, vs) => match mirror.groups.get_mut(*g) {
            Some((_, kids)) => {
                if vs.is_empty() {
                    return false;
                }
                let p = (*p).min(kids.len());
                kids.splice(p..p, vs.iter().copied());
                true
            }
            None => false,
        },
        Op::RemoveGroupChildrenAt(g, b, c) => match mirror.groups.get_mut(*g) {
            Some((_, kids)) => {
                if *b >= kids.len() || *c == 0 {
                    return false;
                }
                let actual = (*c).min(kids.len() - b);
                kids.drain(*b..*b + actual);
                true
            }
            None => false,
        },
        Op::InsertFooter(p, v) => {
            let p = (*p).min(mirror.footers.len());
            mirror.footers.insert(p, *v);
            true
        }
        Op::RemoveFootersAt(b, c) => {
            if *b >= mirror.footers.len() || *c == 0 {
                return false;
            }
            let actual = (*c).min(mirror.footers.len() - b);
            mirror.footers.drain(*b..*b + actual);
            true
        }
        Op::Swap(a, b) => {
            if *a >= mirror.len() || *b >= mirror.len() {
                return false;
            }
            let va = *mirror.slot_mut(*a).unwrap();
            let vb = *mirror.slot_mut(*b).unwrap();
            *mirror.slot_mut(*a).unwrap() = vb;
            *mirror.slot_mut(*b).unwrap() = va;
            true
        }
        Op::UpdateItem(flat, v) => match mirror.slot_mut(*flat) {
            Some(slot) => {
                *slot = *v;
                true
            }
            None => false,
        },
        Op::RemoveItem(flat) => mirror.remove_slot(*flat),
        Op::Clear => {
            *mirror = Mirror::default();
            true
        }
    }
}

fn apply_to_list(list: &mut SegmentedList<u32, Vec<ListEvent>>, op: &Op) -> bool {
    match op {
        Op::InsertHeader(p, v) => {
            list.insert_header(*p, *v);
            true
        }
        Op::InsertHeaders(p, vs) => list.insert_headers(*p, vs.clone()).is_ok(),
        Op::RemoveHeader(v) => list.remove_header(v).is_ok(),
        Op::RemoveHeadersAt(b, c) => list.remove_headers_at(*b, *c).is_ok(),
        Op::InsertChild(p, v) => {
            list.insert_child(*p, *v);
            true
        }
        Op::InsertChildren(p, vs) => list.insert_children(*p, vs.clone()).is_ok(),
        Op::RemoveChild(v) => list.remove_child(v).is_ok(),
        Op::RemoveChildrenAt(b, c) => list.remove_children_at(*b, *c).is_ok(),
        Op::InsertGroup(p, v) => list.insert_group(*p, *v).is_ok(),
        Op::RemoveGroupAt(g) => list.remove_group_at(*g).is_ok(),
        Op::InsertGroupChild(g, p, v) => list.insert_group_child(*g, *p, *v).is_ok(),
        Op::InsertGroupChildren(g, p, vs) => list.insert_group_children(*g, *p, vs.clone()).is_ok(),
        Op::RemoveGroupChildrenAt(g, b, c) => list.remove_group_children_at(*g, *b, *c).is_ok(),
        Op::InsertFooter(p, v) => {
            list.insert_footer(*p, *v);
            true
        }
        Op::RemoveFootersAt(b, c) => list.remove_footers_at(*b, *c).is_ok(),
        Op::Swap(a, b) => list.swap(*a, *b).is_ok(),
        Op::UpdateItem(flat, v) => list.update_item(*flat, *v).is_ok(),
        Op::RemoveItem(flat) => list.remove_item(*flat).is_ok(),
        Op::Clear => {
            list.clear();
            true
        }
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let pos = 0..12_usize;
    let value = 0..25_u32;
    let count = 0..6_usize;
    let batch = prop::collection::vec(0..25_u32, 0..4);
    prop_oneof![
        (pos.clone(), value.clone()).prop_map(|(p, v)| Op::InsertHeader(p, v)),
        (pos.clone(), batch.clone()).prop_map(|(p, vs)| Op::InsertHeaders(p, vs)),
        value.clone().prop_map(Op::RemoveHeader),
        (pos.clone(), count.clone()).prop_map(|(b, c)| Op::RemoveHeadersAt(b, c)),
        (pos.clone(), value.clone()).prop_map(|(p, v)| Op::InsertChild(p, v)),
        (pos.clone(), batch.clone()).prop_map(|(p, vs)| Op::InsertChildren(p, vs)),
        value.clone().prop_map(Op::RemoveChild),
        (pos.clone(), count.clone()).prop_map(|(b, c)| Op::RemoveChildrenAt(b, c)),
        (pos.clone(), value.clone()).prop_map(|(p, v)| Op::InsertGroup(p, v)),
        pos.clone().prop_map(Op::RemoveGroupAt),
        (pos.clone(), pos.clone(), value.clone())
            .prop_map(|(g, p, v)| Op::InsertGroupChild(g, p, v)),
        (pos.clone(), pos.clone(), batch)
            .prop_map(|(g, p, vs)| Op::InsertGroupChildren(g, p, vs)),
        (pos.clone(), pos.clone(), count.clone())
            .prop_map(|(g, b, c)| Op::RemoveGroupChildrenAt(g, b, c)),
        (pos.clone(), value.clone()).prop_map(|(p, v)| Op::InsertFooter(p, v)),
        (pos.clone(), count).prop_map(|(b, c)| Op::RemoveFootersAt(b, c)),
        (0..20_usize, 0..20_usize).prop_map(|(a, b)| Op::Swap(a, b)),
        (0..20_usize, value).prop_map(|(f, v)| Op::UpdateItem(f, v)),
        (0..20_usize).prop_map(Op::RemoveItem),
        Just(Op::Clear),
    ]
}

/// Checks the list against the mirror after one applied operation.
fn assert_in_sync(list: &SegmentedList<u32, Vec<ListEvent>>, mirror: &Mirror) {
    assert_eq!(list.as_slice(), mirror.flatten().as_slice());

    assert_eq!(list.header_count(), mirror.headers.len());
    assert_eq!(list.child_count(), mirror.children.len());
    assert_eq!(list.group_count(), mirror.groups.len());
    for (g, (_, kids)) in mirror.groups.iter().enumerate() {
        assert_eq!(list.group_child_count(g), Some(kids.len()));
    }
    assert_eq!(list.footer_count(), mirror.footers.len());

    let block: usize = mirror.groups.iter().map(|(_, kids)| 1 + kids.len()).sum();
    assert_eq!(list.group_block_len(), block);
    assert_eq!(
        list.len(),
        list.header_count() + list.child_count() + block + list.footer_count()
    );

    for flat in 0..list.len() {
        let back = match list.locate(flat).expect("every slot resolves") {
            ItemRef::Header(p) => list.flat_of_header(p),
            ItemRef::Child(p) => list.flat_of_child(p),
            ItemRef::Group(g) => list.flat_of_group(g),
            ItemRef::GroupChild { group, child } => list.flat_of_group_child(group, child),
            ItemRef::Footer(p) => list.flat_of_footer(p),
        };
        assert_eq!(back, Some(flat), "flat index {flat} did not round-trip");
    }
    assert_eq!(list.locate(list.len()), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_op_sequences_stay_consistent(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut list = SegmentedList::with_sink(Vec::<ListEvent>::new());
        let mut mirror = Mirror::default();

        for op in &ops {
            let events_before = list.sink().len();
            let expected = apply_to_mirror(&mut mirror, op);
            let accepted = apply_to_list(&mut list, op);

            prop_assert_eq!(
                accepted, expected,
                "list and mirror disagree on accepting {:?}", op
            );
            let emitted = list.sink().len() - events_before;
            prop_assert_eq!(
                emitted, usize::from(accepted),
                "{:?} emitted {} notifications", op, emitted
            );
            assert_in_sync(&list, &mirror);
        }
    }

    #[test]
    fn rejected_ops_leave_no_trace(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut list = SegmentedList::with_sink(Vec::<ListEvent>::new());
        let mut mirror = Mirror::default();

        for op in &ops {
            let snapshot = list.as_slice().to_vec();
            let expected = apply_to_mirror(&mut mirror, op);
            let accepted = apply_to_list(&mut list, op);
            prop_assert_eq!(accepted, expected);
            if !accepted {
                prop_assert_eq!(list.as_slice(), snapshot.as_slice());
            }
        }
    }
}
