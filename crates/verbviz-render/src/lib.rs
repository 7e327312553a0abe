#![forbid(unsafe_code)]

//! Render adapter and viewport for diagrams produced by `verbviz-core`.
//!
//! Layout is delegated to an external engine ([`GraphvizEngine`] by default). Its SVG output is
//! indexed by element id so a [`Viewport`] can focus individual verbs.

pub mod adapter;
pub mod engine;
pub mod svg;
pub mod viewport;

pub use adapter::{RenderAdapter, RenderTicket};
pub use engine::{EngineError, GraphvizEngine, LayoutEngine};
pub use svg::{RenderedDiagram, SvgError};
pub use viewport::{Viewport, ViewportOptions};
