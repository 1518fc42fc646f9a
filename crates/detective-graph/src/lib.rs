pub mod details;
pub mod geometry;
pub mod graph;
pub mod hit_tester;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod style;
pub mod view;
pub mod viewport;

pub use details::{Details, DetailsPanel, EdgeDetails, NodeDetails};
pub use geometry::{Rect, Vec2};
pub use graph::{EdgeIndex, GraphModel, NodeIndex};
pub use hit_tester::{HitResult, HitTester, distance_to_segment, point_near_segment};
pub use interaction::{
    CanvasContext, CanvasInput, ClickTarget, DRAG_THRESHOLD, InteractionController,
    InteractionState, Key, Modifiers, PointerButton,
};
pub use layout::{LayoutConfig, Layouter, Positions, SpringLayouter, compute_layout};
pub use render::{DrawPrimitive, draw_list};
pub use style::{Color, GraphStyle, node_fill, palette};
pub use view::{GraphView, GraphViewConfig};
pub use viewport::{Viewport, ZoomDirection};
