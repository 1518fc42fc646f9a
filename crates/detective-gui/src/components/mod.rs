pub mod details_panel;
pub mod graph_canvas;
pub mod notifications;
