//! Incremental bore builder.

use std::collections::HashMap;

use mensur_core::SegId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{ChildLink, Graph, Junction, Segment};
use crate::validate;

/// Name of the trunk sequence every bore must define.
pub const MAIN_GROUP: &str = "MAIN";

#[derive(Debug, Clone)]
struct PendingChild {
    owner: SegId,
    kind: Junction,
    ratio: f64,
    group: String,
}

#[derive(Debug)]
struct OpenChain {
    name: String,
    head: Option<SegId>,
    tail: Option<SegId>,
}

/// Builder for assembling a bore network incrementally.
///
/// Open a group, append sections and junction markers, close it, repeat.
/// `build()` resolves junction targets by group name, wires parent
/// back-references, validates the topology and stamps positions, freezing
/// the result into an immutable [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    segments: Vec<Segment>,
    open: Option<OpenChain>,
    groups: HashMap<String, Option<(SegId, SegId)>>,
    pending: Vec<PendingChild>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a named group. Group names are unique and groups do not nest.
    pub fn begin_group(&mut self, name: impl Into<String>) -> GraphResult<()> {
        let name = name.into();
        if let Some(open) = &self.open {
            return Err(GraphError::NestedGroup {
                name,
                open: open.name.clone(),
            });
        }
        if self.groups.contains_key(&name) {
            return Err(GraphError::DuplicateGroup { name });
        }
        self.open = Some(OpenChain {
            name,
            head: None,
            tail: None,
        });
        Ok(())
    }

    /// Close the open group, recording its chain span for later reference.
    pub fn end_group(&mut self) -> GraphResult<()> {
        let open = self.open.take().ok_or(GraphError::NoOpenGroup)?;
        let span = open.head.zip(open.tail);
        self.groups.insert(open.name, span);
        Ok(())
    }

    /// Append a duct section to the open group. Diameters and length are
    /// in meters; equal diameters make a cylinder, unequal ones a cone.
    pub fn add_section(&mut self, front_dia: f64, back_dia: f64, length: f64) -> GraphResult<SegId> {
        self.push_segment(front_dia, back_dia, length)
    }

    /// Append a zero-length junction marker referencing a named group.
    ///
    /// The marker carries the bore diameter across, so the chain stays
    /// geometrically continuous. Targets are resolved at build time: a
    /// merge attaches to the group's tail, every other kind to its head.
    pub fn add_junction(
        &mut self,
        kind: Junction,
        group: impl Into<String>,
        ratio: f64,
    ) -> GraphResult<SegId> {
        let dia = self.open_back_dia();
        let id = self.push_segment(dia, dia, 0.0)?;
        self.pending.push(PendingChild {
            owner: id,
            kind,
            ratio,
            group: group.into(),
        });
        Ok(id)
    }

    /// Append an open-end marker.
    pub fn add_open_end(&mut self) -> GraphResult<SegId> {
        let dia = self.open_back_dia();
        self.push_segment(dia, dia, 0.0)
    }

    /// Append a closed-end marker. The zero back diameter turns the
    /// radiation load infinite, blocking the end.
    pub fn add_closed_end(&mut self) -> GraphResult<SegId> {
        let dia = self.open_back_dia();
        self.push_segment(dia, 0.0, 0.0)
    }

    /// Splice the geometry of a previously closed group into the open one.
    ///
    /// Only plain sections can be spliced; a group carrying junction
    /// markers is rejected. The source group keeps its own chain intact.
    pub fn insert_group(&mut self, name: &str) -> GraphResult<()> {
        if self.open.is_none() {
            return Err(GraphError::NoOpenGroup);
        }
        let span = self.groups.get(name).ok_or_else(|| GraphError::UnresolvedChild {
            name: name.to_string(),
        })?;
        let Some((head, tail)) = *span else {
            return Ok(());
        };
        let mut rows = Vec::new();
        let mut cur = Some(head);
        while let Some(id) = cur {
            if self.pending.iter().any(|p| p.owner == id) {
                return Err(GraphError::InsertWithJunctions {
                    name: name.to_string(),
                });
            }
            let seg = &self.segments[id.usize()];
            rows.push((seg.front_dia, seg.back_dia, seg.length));
            cur = if id == tail { None } else { seg.next };
        }
        for (df, db, r) in rows {
            self.push_segment(df, db, r)?;
        }
        Ok(())
    }

    /// Resolve names, wire parents, validate and stamp positions.
    pub fn build(mut self) -> GraphResult<Graph> {
        if let Some(open) = &self.open {
            return Err(GraphError::UnclosedGroup {
                name: open.name.clone(),
            });
        }
        let head = match self.groups.get(MAIN_GROUP) {
            Some(Some((head, _))) => *head,
            _ => return Err(GraphError::MissingMain),
        };

        // A group heads at most one side chain and closes at most one loop.
        let mut head_owner: HashMap<SegId, SegId> = HashMap::new();
        let mut merge_owner: HashMap<SegId, SegId> = HashMap::new();
        for p in &self.pending {
            let Some((ghead, gtail)) = self.groups.get(&p.group).copied().flatten() else {
                return Err(GraphError::UnresolvedChild {
                    name: p.group.clone(),
                });
            };
            let target = if p.kind == Junction::Merge {
                if merge_owner.insert(gtail, p.owner).is_some() {
                    return Err(GraphError::SharedChildGroup {
                        name: p.group.clone(),
                    });
                }
                gtail
            } else {
                if head_owner.insert(ghead, p.owner).is_some() {
                    return Err(GraphError::SharedChildGroup {
                        name: p.group.clone(),
                    });
                }
                self.segments[ghead.usize()].parent = Some(p.owner);
                ghead
            };
            self.segments[p.owner.usize()].child = Some(ChildLink {
                kind: p.kind,
                ratio: p.ratio,
                target,
            });
        }

        let mut graph = Graph {
            segments: self.segments,
            head,
        };
        validate::validate(&graph)?;
        assign_positions(&mut graph);
        Ok(graph)
    }

    fn open_back_dia(&self) -> f64 {
        self.open
            .as_ref()
            .and_then(|o| o.tail)
            .map(|id| self.segments[id.usize()].back_dia)
            .unwrap_or(0.0)
    }

    fn push_segment(&mut self, front_dia: f64, back_dia: f64, length: f64) -> GraphResult<SegId> {
        let open = self.open.as_mut().ok_or(GraphError::NoOpenGroup)?;
        let id = SegId::from_index(self.segments.len() as u32);
        let prev = open.tail;
        self.segments.push(Segment {
            front_dia,
            back_dia,
            length,
            group: open.name.clone(),
            position: 0.0,
            next: None,
            prev,
            parent: None,
            child: None,
        });
        if let Some(p) = prev {
            self.segments[p.usize()].next = Some(id);
        }
        if open.head.is_none() {
            open.head = Some(id);
        }
        open.tail = Some(id);
        Ok(id)
    }
}

/// Walk every chain reachable from the trunk and stamp each segment's
/// distance from the network head. A child chain starts where its owning
/// junction sits; merge links point back into already-stamped chains.
pub(crate) fn assign_positions(graph: &mut Graph) {
    let mut stack = vec![(graph.head, 0.0_f64)];
    while let Some((chain, start)) = stack.pop() {
        let mut pos = start;
        let mut cur = Some(chain);
        while let Some(id) = cur {
            let seg = &mut graph.segments[id.usize()];
            seg.position = pos;
            pos += seg.length;
            if let Some(link) = &seg.child {
                if link.kind != Junction::Merge {
                    stack.push((link.target, pos));
                }
            }
            cur = seg.next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_section_main() -> GraphBuilder {
        let mut b = GraphBuilder::new();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.012, 0.012, 0.3).unwrap();
        b.add_section(0.012, 0.02, 0.2).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        b
    }

    #[test]
    fn builder_links_a_chain() {
        let graph = two_section_main().build().unwrap();
        assert_eq!(graph.len(), 3);
        let head = graph.segment(graph.head()).unwrap();
        assert_eq!(head.prev, None);
        let second = graph.segment(head.next.unwrap()).unwrap();
        assert_eq!(second.prev, Some(graph.head()));
        // The end marker carries the final bore diameter across.
        let marker = graph.segment(second.next.unwrap()).unwrap();
        assert_eq!(marker.front_dia, 0.02);
        assert_eq!(marker.back_dia, 0.02);
        assert_eq!(marker.length, 0.0);
    }

    #[test]
    fn builder_stamps_positions() {
        let graph = two_section_main().build().unwrap();
        let xs: Vec<f64> = graph.segments().iter().map(|s| s.position).collect();
        assert_eq!(xs, vec![0.0, 0.3, 0.5]);
    }

    #[test]
    fn closed_end_blocks_with_zero_diameter() {
        let mut b = GraphBuilder::new();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.01, 0.01, 0.1).unwrap();
        b.add_closed_end().unwrap();
        b.end_group().unwrap();
        let graph = b.build().unwrap();
        let tail = graph.segment(graph.chain_tail(graph.head())).unwrap();
        assert_eq!(tail.front_dia, 0.01);
        assert_eq!(tail.back_dia, 0.0);
    }

    #[test]
    fn junction_resolves_to_group_head() {
        let mut b = GraphBuilder::new();
        b.begin_group("hole").unwrap();
        b.add_section(0.006, 0.006, 0.015).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.012, 0.012, 0.3).unwrap();
        let marker = b.add_junction(Junction::Split, "hole", 0.5).unwrap();
        b.add_section(0.012, 0.012, 0.2).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        let graph = b.build().unwrap();

        let link = graph.segment(marker).unwrap().child.clone().unwrap();
        assert_eq!(link.kind, Junction::Split);
        let hole_head = graph.segment(link.target).unwrap();
        assert_eq!(hole_head.group, "hole");
        assert_eq!(hole_head.parent, Some(marker));
        // Side chain positions continue from the junction.
        assert!((hole_head.position - 0.3).abs() < 1e-12);
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let mut b = GraphBuilder::new();
        b.begin_group("g").unwrap();
        b.end_group().unwrap();
        assert!(matches!(
            b.begin_group("g"),
            Err(GraphError::DuplicateGroup { .. })
        ));
    }

    #[test]
    fn nested_group_is_rejected() {
        let mut b = GraphBuilder::new();
        b.begin_group(MAIN_GROUP).unwrap();
        assert!(matches!(
            b.begin_group("g"),
            Err(GraphError::NestedGroup { .. })
        ));
    }

    #[test]
    fn unclosed_group_fails_build() {
        let mut b = GraphBuilder::new();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.01, 0.01, 0.1).unwrap();
        assert!(matches!(b.build(), Err(GraphError::UnclosedGroup { .. })));
    }

    #[test]
    fn missing_main_fails_build() {
        let mut b = GraphBuilder::new();
        b.begin_group("side").unwrap();
        b.add_section(0.01, 0.01, 0.1).unwrap();
        b.end_group().unwrap();
        assert!(matches!(b.build(), Err(GraphError::MissingMain)));
    }

    #[test]
    fn unresolved_child_fails_build() {
        let mut b = GraphBuilder::new();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.01, 0.01, 0.1).unwrap();
        b.add_junction(Junction::Split, "nowhere", 0.5).unwrap();
        b.add_section(0.01, 0.01, 0.1).unwrap();
        b.end_group().unwrap();
        assert!(matches!(
            b.build(),
            Err(GraphError::UnresolvedChild { .. })
        ));
    }

    #[test]
    fn shared_child_group_fails_build() {
        let mut b = GraphBuilder::new();
        b.begin_group("hole").unwrap();
        b.add_section(0.006, 0.006, 0.015).unwrap();
        b.end_group().unwrap();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.012, 0.012, 0.1).unwrap();
        b.add_junction(Junction::Split, "hole", 0.5).unwrap();
        b.add_section(0.012, 0.012, 0.1).unwrap();
        b.add_junction(Junction::Split, "hole", 0.5).unwrap();
        b.add_section(0.012, 0.012, 0.1).unwrap();
        b.end_group().unwrap();
        assert!(matches!(
            b.build(),
            Err(GraphError::SharedChildGroup { .. })
        ));
    }

    #[test]
    fn insert_splices_geometry() {
        let mut b = GraphBuilder::new();
        b.begin_group("lead").unwrap();
        b.add_section(0.01, 0.011, 0.05).unwrap();
        b.add_section(0.011, 0.012, 0.05).unwrap();
        b.end_group().unwrap();
        b.begin_group(MAIN_GROUP).unwrap();
        b.insert_group("lead").unwrap();
        b.add_section(0.012, 0.012, 0.4).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        let graph = b.build().unwrap();

        // Two source rows, two spliced copies, one section, one marker.
        assert_eq!(graph.len(), 6);
        let head = graph.segment(graph.head()).unwrap();
        assert_eq!(head.group, MAIN_GROUP);
        assert_eq!(head.front_dia, 0.01);
        assert!((graph.segment(graph.chain_tail(graph.head())).unwrap().position - 0.5).abs() < 1e-12);
    }

    #[test]
    fn insert_of_junction_group_is_rejected() {
        let mut b = GraphBuilder::new();
        b.begin_group("hole").unwrap();
        b.add_section(0.006, 0.006, 0.015).unwrap();
        b.end_group().unwrap();
        b.begin_group("looped").unwrap();
        b.add_section(0.01, 0.01, 0.05).unwrap();
        b.add_junction(Junction::Split, "hole", 0.5).unwrap();
        b.add_section(0.01, 0.01, 0.05).unwrap();
        b.end_group().unwrap();
        b.begin_group(MAIN_GROUP).unwrap();
        assert!(matches!(
            b.insert_group("looped"),
            Err(GraphError::InsertWithJunctions { .. })
        ));
    }
}
