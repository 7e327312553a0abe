#![forbid(unsafe_code)]

//! `verbviz` turns a module/verb schema snapshot into call-graph diagrams.
//!
//! The core (always available) builds the graph and emits Graphviz DOT in two dialects or
//! flowchart markup. See [`generate`].
//!
//! # Features
//!
//! - `render`: run an external layout engine and drive a pan/zoom viewport (`verbviz::render`)
//! - `raster`: PNG/PDF output via pure-Rust SVG rasterization/conversion

pub use verbviz_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use verbviz_render::{
        EngineError, GraphvizEngine, LayoutEngine, RenderAdapter, RenderTicket, RenderedDiagram,
        SvgError, Viewport, ViewportOptions,
    };

    use verbviz_core::{BuildOptions, DotDialect, Schema, VerbvizConfig};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Config(#[from] verbviz_core::Error),
        #[error(transparent)]
        Engine(#[from] EngineError),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Bundles a render adapter with the graph and viewport settings for one host.
    ///
    /// Each request generates DOT from the given snapshot, so a host only has to hand over the
    /// latest schema; superseded renders come back as `None`.
    #[derive(Debug)]
    pub struct HeadlessRenderer<E = GraphvizEngine> {
        pub adapter: RenderAdapter<E>,
        pub dialect: DotDialect,
        pub build: BuildOptions,
        pub viewport: ViewportOptions,
    }

    impl Default for HeadlessRenderer {
        fn default() -> Self {
            Self::new(GraphvizEngine::default())
        }
    }

    impl HeadlessRenderer {
        pub fn from_config(config: &VerbvizConfig) -> Result<Self> {
            Ok(Self {
                adapter: RenderAdapter::new(GraphvizEngine::from_config(config)?),
                dialect: DotDialect::default(),
                build: config.build_options()?,
                viewport: ViewportOptions::from_config(config),
            })
        }
    }

    impl<E: LayoutEngine> HeadlessRenderer<E> {
        pub fn new(engine: E) -> Self {
            Self {
                adapter: RenderAdapter::new(engine),
                dialect: DotDialect::default(),
                build: BuildOptions::default(),
                viewport: ViewportOptions::default(),
            }
        }

        pub fn with_dialect(mut self, dialect: DotDialect) -> Self {
            self.dialect = dialect;
            self
        }

        pub fn with_build_options(mut self, build: BuildOptions) -> Self {
            self.build = build;
            self
        }

        pub fn with_viewport_options(mut self, viewport: ViewportOptions) -> Self {
            self.viewport = viewport;
            self
        }

        pub fn dot(&self, schema: &Schema) -> String {
            let graph = verbviz_core::build_call_graph(schema, &self.build);
            verbviz_core::dot::render_dot(&graph, self.dialect)
        }

        /// Synchronous render helper (executor-free); engine errors are returned, not logged.
        pub fn render_sync(&self, schema: &Schema) -> Result<RenderedDiagram> {
            Ok(self.adapter.try_render(&self.dot(schema))?)
        }

        pub async fn render(&self, schema: &Schema) -> Option<RenderedDiagram> {
            let ticket = self.adapter.begin();
            let dot = self.dot(schema);
            self.adapter.render_with(ticket, &dot).await
        }

        /// Renders and mounts the result; `None` when no diagram is available.
        pub async fn mount(&self, schema: &Schema) -> Option<Viewport> {
            let diagram = self.render(schema).await?;
            tracing::debug!(
                width = diagram.size().width,
                height = diagram.size().height,
                "mounting rendered diagram"
            );
            Some(Viewport::mount(diagram, self.viewport))
        }
    }

}
