use crate::geometry::{Rect, Vec2};
use crate::graph::GraphModel;
use detective_core::NodeId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Logical position of every laid-out node.
pub type Positions = HashMap<NodeId, Vec2>;

pub trait Layouter {
    /// Place every node of `model` inside `viewport`.
    fn compute(&self, model: &GraphModel, viewport: Rect) -> Positions;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub iterations: usize,
    pub seed: u64,
    /// Margin kept free on every side of the viewport.
    pub padding: f32,
    /// Ideal edge length of the raw simulation; `None` uses `1/sqrt(n)`.
    pub optimal_distance: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: 73,
            padding: 50.0,
            optimal_distance: Some(2.0),
        }
    }
}

/// Fruchterman-Reingold spring layout on a unit square, fitted to the viewport afterwards.
#[derive(Debug, Clone, Default)]
pub struct SpringLayouter {
    pub config: LayoutConfig,
}

impl SpringLayouter {
    const MIN_DISTANCE: f64 = 0.01;
    const CONVERGENCE_THRESHOLD: f64 = 1e-4;
    const INITIAL_TEMPERATURE: f64 = 0.1;

    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Raw simulation output in model node order, before fitting.
    fn simulate(&self, model: &GraphModel) -> Vec<[f64; 2]> {
        let n = model.node_count();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut pos: Vec<[f64; 2]> = (0..n)
            .map(|_| [rng.random::<f64>(), rng.random::<f64>()])
            .collect();
        if n < 2 {
            return pos;
        }

        // Attraction acts along edges in both directions.
        let mut adjacency = vec![vec![false; n]; n];
        for (source, target) in model.edge_endpoints() {
            if source != target {
                adjacency[source.0][target.0] = true;
                adjacency[target.0][source.0] = true;
            }
        }

        let k = self
            .config
            .optimal_distance
            .filter(|k| *k > 0.0)
            .unwrap_or_else(|| (1.0 / n as f64).sqrt());

        let span = |axis: usize| {
            let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            hi - lo
        };
        let mut temperature = span(0).max(span(1)) * Self::INITIAL_TEMPERATURE;
        let cooling = temperature / (self.config.iterations as f64 + 1.0);

        let mut displacement = vec![[0.0f64; 2]; n];
        for _ in 0..self.config.iterations {
            for (i, disp) in displacement.iter_mut().enumerate() {
                *disp = [0.0, 0.0];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                    let distance = delta[0].hypot(delta[1]).max(Self::MIN_DISTANCE);
                    let attraction = if adjacency[i][j] { distance / k } else { 0.0 };
                    let force = k * k / (distance * distance) - attraction;
                    disp[0] += delta[0] * force;
                    disp[1] += delta[1] * force;
                }
            }

            let mut moved_sq = 0.0;
            for (p, disp) in pos.iter_mut().zip(&displacement) {
                let mut length = disp[0].hypot(disp[1]);
                if length < Self::MIN_DISTANCE {
                    length = 0.1;
                }
                let step = [disp[0] * temperature / length, disp[1] * temperature / length];
                p[0] += step[0];
                p[1] += step[1];
                moved_sq += step[0] * step[0] + step[1] * step[1];
            }
            temperature -= cooling;

            if moved_sq.sqrt() / (n as f64) < Self::CONVERGENCE_THRESHOLD {
                break;
            }
        }
        pos
    }
}

impl Layouter for SpringLayouter {
    fn compute(&self, model: &GraphModel, viewport: Rect) -> Positions {
        if model.is_empty() {
            return Positions::new();
        }
        let raw = self.simulate(model);
        let fitted = fit_to_viewport(&raw, viewport, self.config.padding);
        model
            .nodes()
            .iter()
            .zip(fitted)
            .map(|(node, position)| (node.id.clone(), position))
            .collect()
    }
}

/// Uniformly scale and center raw positions so they fill `viewport` minus `padding`.
///
/// A zero-width or zero-height bounding box is treated as having unit extent.
pub fn fit_to_viewport(raw: &[[f64; 2]], viewport: Rect, padding: f32) -> Vec<Vec2> {
    if raw.is_empty() {
        return Vec::new();
    }
    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for p in raw {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    let mut width = max_x - min_x;
    let mut height = max_y - min_y;
    if width == 0.0 {
        width = 1.0;
    }
    if height == 0.0 {
        height = 1.0;
    }

    let padding = padding as f64;
    let scale_x = (viewport.width() as f64 - 2.0 * padding) / width;
    let scale_y = (viewport.height() as f64 - 2.0 * padding) / height;
    let scale = scale_x.min(scale_y).max(0.0);

    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    let target = viewport.center();
    raw.iter()
        .map(|p| {
            Vec2::new(
                target.x + ((p[0] - center_x) * scale) as f32,
                target.y + ((p[1] - center_y) * scale) as f32,
            )
        })
        .collect()
}

/// One-shot layout with the default spring configuration.
pub fn compute_layout(model: &GraphModel, viewport: Rect) -> Positions {
    SpringLayouter::default().compute(model, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::{GraphEdge, GraphNode, Properties};

    pub(crate) fn chain(n: usize) -> GraphModel {
        let mut model = GraphModel::new();
        for i in 0..n {
            model.add_node(GraphNode::new(
                NodeId::new(format!("n{i}")),
                vec!["Location".into()],
                Properties::new(),
            ));
        }
        for i in 1..n {
            model.add_edge(GraphEdge {
                source: NodeId::new(format!("n{}", i - 1)),
                target: NodeId::new(format!("n{i}")),
                rel_type: "NEAR".into(),
                properties: Properties::new(),
            });
        }
        model
    }

    fn viewport() -> Rect {
        Rect::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_empty_graph_yields_no_positions() {
        assert!(compute_layout(&GraphModel::new(), viewport()).is_empty());
    }

    #[test]
    fn test_single_node_is_centered() {
        let positions = compute_layout(&chain(1), viewport());
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[&NodeId::new("n0")], Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_every_node_gets_a_position() {
        let model = chain(6);
        let positions = compute_layout(&model, viewport());
        assert_eq!(positions.len(), 6);
        for node in model.nodes() {
            assert!(positions.contains_key(&node.id));
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let model = chain(5);
        let first = compute_layout(&model, viewport());
        let second = compute_layout(&model, viewport());
        assert_eq!(first, second);
    }

    #[test]
    fn test_fit_respects_padding_and_aspect() {
        let raw = [[0.0, 0.0], [2.0, 1.0]];
        let fitted = fit_to_viewport(&raw, viewport(), 50.0);
        // x is the limiting axis: 700 / 2 = 350 units per raw unit.
        assert_eq!(fitted[0], Vec2::new(50.0, 125.0));
        assert_eq!(fitted[1], Vec2::new(750.0, 475.0));
    }

    #[test]
    fn test_fit_colinear_points_uses_unit_extent() {
        let raw = [[0.0, 5.0], [0.0, 5.0]];
        let fitted = fit_to_viewport(&raw, viewport(), 50.0);
        assert_eq!(fitted[0], Vec2::new(400.0, 300.0));
        assert_eq!(fitted[1], Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_viewport_smaller_than_padding_collapses_to_center() {
        let tiny = Rect::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(40.0, 40.0));
        let positions = compute_layout(&chain(3), tiny);
        for position in positions.values() {
            assert_eq!(*position, Vec2::new(30.0, 30.0));
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::tests::chain;
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every position lands inside the viewport (minus padding), up to float error.
        #[test]
        fn prop_layout_containment(
            n in 1usize..12,
            seed in 0u64..1000,
            width in 150.0f32..1600.0,
            height in 150.0f32..1200.0,
        ) {
            let viewport = Rect::from_pos_size(Vec2::new(20.0, 30.0), Vec2::new(width, height));
            let layouter = SpringLayouter::new(LayoutConfig { seed, ..LayoutConfig::default() });
            let positions = layouter.compute(&chain(n), viewport);
            prop_assert_eq!(positions.len(), n);
            let inner = viewport.expand(-layouter.config.padding).expand(0.01);
            for position in positions.values() {
                prop_assert!(inner.contains(*position), "{:?} outside {:?}", position, inner);
            }
        }

        #[test]
        fn prop_layout_determinism(n in 1usize..10, seed in 0u64..1000) {
            let viewport = Rect::from_pos_size(Vec2::ZERO, Vec2::new(900.0, 700.0));
            let layouter = SpringLayouter::new(LayoutConfig { seed, ..LayoutConfig::default() });
            let model = chain(n);
            prop_assert_eq!(layouter.compute(&model, viewport), layouter.compute(&model, viewport));
        }
    }
}
