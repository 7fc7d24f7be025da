//! Structural validation of built graphs.

use mensur_core::SegId;

use crate::builder::MAIN_GROUP;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, Junction, Segment};

/// Validate a freshly assembled graph.
///
/// Geometry has to be finite and non-negative, chains have to mirror
/// their next/prev links and stay acyclic, and every junction needs a
/// resolvable, well-oriented target.
pub(crate) fn validate(graph: &Graph) -> GraphResult<()> {
    for (i, seg) in graph.segments().iter().enumerate() {
        let id = SegId::from_index(i as u32);
        check_geometry(id, seg)?;
        check_links(graph, id, seg)?;
        check_junction(graph, id, seg)?;
    }
    check_acyclic(graph)?;
    check_child_nesting(graph)?;
    Ok(())
}

fn check_geometry(id: SegId, seg: &Segment) -> GraphResult<()> {
    if !seg.front_dia.is_finite() || !seg.back_dia.is_finite() || !seg.length.is_finite() {
        return Err(GraphError::NonFiniteGeometry { seg: id });
    }
    if seg.front_dia < 0.0 {
        return Err(GraphError::NegativeGeometry {
            seg: id,
            what: "front diameter",
        });
    }
    if seg.back_dia < 0.0 {
        return Err(GraphError::NegativeGeometry {
            seg: id,
            what: "back diameter",
        });
    }
    if seg.length < 0.0 {
        return Err(GraphError::NegativeGeometry {
            seg: id,
            what: "length",
        });
    }
    // Zero diameters are end markers; a duct needs an open bore.
    if seg.length > 0.0 && (seg.front_dia <= 0.0 || seg.back_dia <= 0.0) {
        return Err(GraphError::ZeroDiameterSection { seg: id });
    }
    Ok(())
}

fn check_links(graph: &Graph, id: SegId, seg: &Segment) -> GraphResult<()> {
    if let Some(next) = seg.next {
        let mirrored = graph.segment(next).is_some_and(|n| n.prev == Some(id));
        if !mirrored {
            return Err(GraphError::InconsistentLinks { seg: id });
        }
    }
    if let Some(prev) = seg.prev {
        let mirrored = graph.segment(prev).is_some_and(|p| p.next == Some(id));
        if !mirrored {
            return Err(GraphError::InconsistentLinks { seg: id });
        }
    }
    Ok(())
}

fn check_junction(graph: &Graph, id: SegId, seg: &Segment) -> GraphResult<()> {
    let Some(link) = &seg.child else {
        return Ok(());
    };
    if !(0.0..=1.0).contains(&link.ratio) {
        return Err(GraphError::RatioOutOfRange {
            seg: id,
            ratio: link.ratio,
        });
    }
    if seg.next.is_none() {
        return Err(GraphError::JunctionAtChainEnd { seg: id });
    }
    let Some(target) = graph.segment(link.target) else {
        return Err(GraphError::InconsistentLinks { seg: id });
    };
    if target.group == seg.group {
        return Err(GraphError::ChildTargetsOwnChain { seg: id });
    }
    if target.group == MAIN_GROUP {
        return Err(GraphError::ChildTargetsMain { seg: id });
    }
    match link.kind {
        Junction::Merge => {}
        _ => {
            // Head targets carry the owner back-reference.
            if target.parent != Some(id) {
                return Err(GraphError::InconsistentLinks { seg: id });
            }
        }
    }
    if link.kind == Junction::Branch && graph.merge_of(id).is_none() {
        return Err(GraphError::MissingMerge { seg: id });
    }
    Ok(())
}

/// Group references must nest: the solver recurses into side chains,
/// so a reference cycle between groups would never terminate.
fn check_child_nesting(graph: &Graph) -> GraphResult<()> {
    use std::collections::HashMap;

    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for seg in graph.segments() {
        if let Some(link) = &seg.child {
            if link.kind == Junction::Merge {
                continue;
            }
            if let Some(target) = graph.segment(link.target) {
                edges
                    .entry(seg.group.as_str())
                    .or_default()
                    .push(target.group.as_str());
            }
        }
    }

    // 0 = unvisited, 1 = on the current path, 2 = done.
    let mut marks: HashMap<&str, u8> = HashMap::new();
    fn visit<'a>(
        name: &'a str,
        edges: &HashMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, u8>,
    ) -> GraphResult<()> {
        match marks.get(name).copied().unwrap_or(0) {
            1 => {
                return Err(GraphError::ChildCycle {
                    name: name.to_string(),
                })
            }
            2 => return Ok(()),
            _ => {}
        }
        marks.insert(name, 1);
        if let Some(targets) = edges.get(name) {
            for target in targets {
                visit(target, edges, marks)?;
            }
        }
        marks.insert(name, 2);
        Ok(())
    }
    let names: Vec<&str> = edges.keys().copied().collect();
    for name in names {
        visit(name, &edges, &mut marks)?;
    }
    Ok(())
}

/// Following `next` from any segment must terminate within the arena size.
fn check_acyclic(graph: &Graph) -> GraphResult<()> {
    let limit = graph.len();
    for i in 0..limit {
        let start = SegId::from_index(i as u32);
        let mut cur = Some(start);
        let mut steps = 0usize;
        while let Some(id) = cur {
            if steps > limit {
                return Err(GraphError::InconsistentLinks { seg: start });
            }
            steps += 1;
            cur = graph.segment(id).and_then(|s| s.next);
        }
    }
    Ok(())
}
