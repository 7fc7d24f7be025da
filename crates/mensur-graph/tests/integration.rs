//! Integration tests for mensur-graph.

use mensur_core::SegId;
use mensur_graph::{GraphBuilder, Junction, MAIN_GROUP};

/// Straight bore with one open tone hole halfway down.
///
///   MAIN: [0.3 m] --SPLIT(hole)--> [0.2 m] --OPEN_END
///   hole: [0.015 m] --OPEN_END
fn tonehole_bore() -> mensur_graph::Graph {
    let mut b = GraphBuilder::new();
    b.begin_group("hole").unwrap();
    b.add_section(0.006, 0.006, 0.015).unwrap();
    b.add_open_end().unwrap();
    b.end_group().unwrap();
    b.begin_group(MAIN_GROUP).unwrap();
    b.add_section(0.012, 0.012, 0.3).unwrap();
    b.add_junction(Junction::Split, "hole", 0.8).unwrap();
    b.add_section(0.012, 0.012, 0.2).unwrap();
    b.add_open_end().unwrap();
    b.end_group().unwrap();
    b.build().unwrap()
}

/// Trunk with a valve loop:
///
///   MAIN: [0.1 m] --BRANCH(loop)--> [0.1 m] --MERGE(loop)--> [0.2 m] --OPEN_END
///   loop: [0.25 m]
fn valve_bore(ratio: f64) -> mensur_graph::Graph {
    let mut b = GraphBuilder::new();
    b.begin_group("loop").unwrap();
    b.add_section(0.012, 0.012, 0.25).unwrap();
    b.end_group().unwrap();
    b.begin_group(MAIN_GROUP).unwrap();
    b.add_section(0.012, 0.012, 0.1).unwrap();
    b.add_junction(Junction::Branch, "loop", ratio).unwrap();
    b.add_section(0.012, 0.012, 0.1).unwrap();
    b.add_junction(Junction::Merge, "loop", ratio).unwrap();
    b.add_section(0.012, 0.012, 0.2).unwrap();
    b.add_open_end().unwrap();
    b.end_group().unwrap();
    b.build().unwrap()
}

#[test]
fn tonehole_topology() {
    let graph = tonehole_bore();
    // hole section and marker, then four MAIN rows.
    assert_eq!(graph.len(), 6);

    let head = graph.head();
    let trunk_tail = graph.chain_tail(head);
    assert_eq!(graph.segment(trunk_tail).unwrap().group, MAIN_GROUP);
    assert_eq!(graph.segment(trunk_tail).unwrap().next, None);

    let marker_id = SegId::from_index(3);
    let marker = graph.segment(marker_id).unwrap();
    let link = marker.child.as_ref().unwrap();
    assert_eq!(link.kind, Junction::Split);
    assert_eq!(graph.segment(link.target).unwrap().group, "hole");
}

#[test]
fn merge_lookup_finds_the_rejoin_point() {
    let graph = valve_bore(0.5);
    let branch_id = graph
        .segments()
        .iter()
        .position(|s| matches!(&s.child, Some(l) if l.kind == Junction::Branch))
        .map(|i| SegId::from_index(i as u32))
        .unwrap();

    let merge_id = graph.merge_of(branch_id).unwrap();
    let merge = graph.segment(merge_id).unwrap();
    let link = merge.child.as_ref().unwrap();
    assert_eq!(link.kind, Junction::Merge);
    // The merge points at the loop chain's tail.
    assert_eq!(graph.chain_tail(SegId::from_index(0)), link.target);
    // Merges never answer the lookup themselves.
    assert_eq!(graph.merge_of(merge_id), None);
}

#[test]
fn dominant_path_stays_on_trunk_for_small_ratios() {
    let graph = valve_bore(0.3);
    let mut seen = Vec::new();
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        seen.push(graph.segment(id).unwrap().group.clone());
        cur = graph.path_next(id);
    }
    assert!(seen.iter().all(|g| g == MAIN_GROUP));
    assert_eq!(seen.len(), 6);
}

#[test]
fn dominant_path_follows_an_engaged_valve() {
    let graph = valve_bore(1.0);
    let mut seen = Vec::new();
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        seen.push(id);
        cur = graph.path_next(id);
    }
    let groups: Vec<&str> = seen
        .iter()
        .map(|id| graph.segment(*id).unwrap().group.as_str())
        .collect();
    // Trunk, dive into the loop at the branch, rejoin at the merge.
    assert_eq!(
        groups,
        vec![MAIN_GROUP, MAIN_GROUP, "loop", MAIN_GROUP, MAIN_GROUP, MAIN_GROUP]
    );

    // Walking backward retraces the same segments.
    let mut back = Vec::new();
    let mut cur = seen.last().copied();
    while let Some(id) = cur {
        back.push(id);
        cur = graph.path_prev(id);
    }
    back.reverse();
    assert_eq!(back, seen);
}

#[test]
fn dominant_path_enters_a_wide_open_tonehole() {
    let graph = tonehole_bore();
    let mut cur = Some(graph.head());
    let mut last = None;
    while let Some(id) = cur {
        last = Some(id);
        cur = graph.path_next(id);
    }
    // Ratio 0.8 diverts the walk out through the hole chain.
    let tail = graph.segment(last.unwrap()).unwrap();
    assert_eq!(tail.group, "hole");
    assert_eq!(tail.length, 0.0);
}

#[test]
fn positions_accumulate_through_the_network() {
    let graph = valve_bore(0.5);
    let xs: Vec<f64> = graph.segments().iter().map(|s| s.position).collect();
    // loop chain starts at the branch marker 0.1 m in.
    assert!((xs[0] - 0.1).abs() < 1e-12);
    // trunk rows: 0, 0.1, 0.1, 0.2, 0.2, 0.4
    assert!((xs[1]).abs() < 1e-12);
    assert!((xs[5] - 0.2).abs() < 1e-12);
    assert!((xs[6] - 0.4).abs() < 1e-12);
}

#[test]
fn subdivided_network_keeps_its_topology() {
    let graph = tonehole_bore().subdivided(0.01).unwrap();

    // Dominant path still exits through the hole.
    let mut cur = Some(graph.head());
    let mut last = None;
    while let Some(id) = cur {
        last = Some(id);
        cur = graph.path_next(id);
    }
    assert_eq!(graph.segment(last.unwrap()).unwrap().group, "hole");

    // Total trunk length is preserved.
    let trunk: f64 = graph
        .segments()
        .iter()
        .filter(|s| s.group == MAIN_GROUP)
        .map(|s| s.length)
        .sum();
    assert!((trunk - 0.5).abs() < 1e-12);
}
