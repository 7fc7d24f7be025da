//! Subdivision of bore sections into short slices.
//!
//! Pressure profiles are sampled per segment, so a plot along the bore
//! needs the long sections cut into pieces first. Slicing preserves the
//! acoustics: the transmission matrix of a cone equals the product of
//! the matrices of its slices.

use mensur_core::SegId;

use crate::builder::assign_positions;
use crate::error::{GraphError, GraphResult};
use crate::graph::{ChildLink, Graph, Junction, Segment};

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Graph {
    /// Copy of this graph with every section cut into equal slices no
    /// longer than `step` meters, diameters interpolated along the cone.
    ///
    /// Junction markers stay single slices; a junction riding a sliced
    /// segment moves to its last slice, merge targets follow chain tails
    /// and head targets follow chain heads. Positions are restamped.
    pub fn subdivided(&self, step: f64) -> GraphResult<Graph> {
        if !step.is_finite() || step <= 0.0 {
            return Err(GraphError::InvalidStep { step });
        }

        let mut first = Vec::with_capacity(self.segments.len());
        let mut last = Vec::with_capacity(self.segments.len());
        let mut out: Vec<Segment> = Vec::new();

        for seg in &self.segments {
            // Slack absorbs roundoff when the length is a multiple of step.
            let n = if seg.length > 0.0 {
                ((seg.length / step) - 1e-9).ceil().max(1.0) as usize
            } else {
                1
            };
            let base = out.len();
            first.push(SegId::from_index(base as u32));
            last.push(SegId::from_index((base + n - 1) as u32));
            let slice_len = seg.length / n as f64;
            for i in 0..n {
                let t0 = i as f64 / n as f64;
                let t1 = (i + 1) as f64 / n as f64;
                let prev = (i > 0).then(|| SegId::from_index((base + i - 1) as u32));
                let next = (i + 1 < n).then(|| SegId::from_index((base + i + 1) as u32));
                out.push(Segment {
                    front_dia: lerp(seg.front_dia, seg.back_dia, t0),
                    back_dia: lerp(seg.front_dia, seg.back_dia, t1),
                    length: slice_len,
                    group: seg.group.clone(),
                    position: 0.0,
                    next,
                    prev,
                    parent: None,
                    child: None,
                });
            }
        }

        // Rewire chain boundaries and junction references.
        for (i, seg) in self.segments.iter().enumerate() {
            let f = first[i].usize();
            let l = last[i].usize();
            out[l].next = seg.next.map(|n| first[n.usize()]);
            out[f].prev = seg.prev.map(|p| last[p.usize()]);
            out[f].parent = seg.parent.map(|p| last[p.usize()]);
            out[l].child = seg.child.as_ref().map(|link| ChildLink {
                kind: link.kind,
                ratio: link.ratio,
                target: match link.kind {
                    Junction::Merge => last[link.target.usize()],
                    _ => first[link.target.usize()],
                },
            });
        }

        let mut graph = Graph {
            segments: out,
            head: first[self.head.usize()],
        };
        assign_positions(&mut graph);
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{GraphBuilder, MAIN_GROUP};

    fn cone_main() -> Graph {
        let mut b = GraphBuilder::new();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.01, 0.02, 0.1).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        b.build().unwrap()
    }

    #[test]
    fn slices_are_equal_and_cover_the_section() {
        let graph = cone_main().subdivided(0.001).unwrap();
        // 100 slices plus the end marker.
        assert_eq!(graph.len(), 101);
        let total: f64 = graph.segments().iter().map(|s| s.length).sum();
        assert!((total - 0.1).abs() < 1e-12);
        for s in graph.segments().iter().take(100) {
            assert!((s.length - 0.001).abs() < 1e-12);
        }
    }

    #[test]
    fn diameters_interpolate_linearly() {
        let graph = cone_main().subdivided(0.05).unwrap();
        let segs = graph.segments();
        assert_eq!(segs.len(), 3);
        assert!((segs[0].front_dia - 0.01).abs() < 1e-12);
        assert!((segs[0].back_dia - 0.015).abs() < 1e-12);
        assert!((segs[1].front_dia - 0.015).abs() < 1e-12);
        assert!((segs[1].back_dia - 0.02).abs() < 1e-12);
        // Slice boundaries chain up and positions restamp.
        assert_eq!(segs[0].next, Some(SegId::from_index(1)));
        assert_eq!(segs[1].prev, Some(SegId::from_index(0)));
        assert!((segs[1].position - 0.05).abs() < 1e-12);
        assert!((segs[2].position - 0.1).abs() < 1e-12);
    }

    #[test]
    fn roundoff_does_not_add_a_slice() {
        // 0.1 / 0.02 is not exact in binary.
        let graph = cone_main().subdivided(0.02).unwrap();
        assert_eq!(graph.len(), 6);
    }

    #[test]
    fn markers_stay_single_slices() {
        let graph = cone_main().subdivided(0.001).unwrap();
        let tail = graph.segment(graph.chain_tail(graph.head())).unwrap();
        assert_eq!(tail.length, 0.0);
        assert_eq!(tail.front_dia, 0.02);
    }

    #[test]
    fn junction_targets_survive_subdivision() {
        let mut b = GraphBuilder::new();
        b.begin_group("hole").unwrap();
        b.add_section(0.006, 0.006, 0.02).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        b.begin_group(MAIN_GROUP).unwrap();
        b.add_section(0.012, 0.012, 0.1).unwrap();
        b.add_junction(Junction::Split, "hole", 0.5).unwrap();
        b.add_section(0.012, 0.012, 0.1).unwrap();
        b.add_open_end().unwrap();
        b.end_group().unwrap();
        let graph = b.build().unwrap().subdivided(0.01).unwrap();

        let marker = graph
            .segments()
            .iter()
            .position(|s| s.child.is_some())
            .map(|i| SegId::from_index(i as u32))
            .unwrap();
        let link = graph.segment(marker).unwrap().child.clone().unwrap();
        let target = graph.segment(link.target).unwrap();
        assert_eq!(target.group, "hole");
        assert_eq!(target.prev, None);
        assert_eq!(target.parent, Some(marker));
        assert!((target.position - 0.1).abs() < 1e-12);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let graph = cone_main();
        assert!(matches!(
            graph.subdivided(0.0),
            Err(GraphError::InvalidStep { .. })
        ));
        assert!(matches!(
            graph.subdivided(-0.5),
            Err(GraphError::InvalidStep { .. })
        ));
    }
}
