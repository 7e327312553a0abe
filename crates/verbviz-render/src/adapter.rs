use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::{EngineError, LayoutEngine};
use crate::svg::RenderedDiagram;

/// Generation number handed out per render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Hands DOT text to a [`LayoutEngine`] and yields a parsed diagram, or nothing.
///
/// Every request takes a ticket from a monotonically increasing counter. Only the most recent
/// ticket is current: a result that completes after a newer request was issued is discarded so
/// hosts never mount stale graphics.
///
/// The engine runs synchronously inside the returned future, on whichever thread polls it; for
/// [`crate::GraphvizEngine`] that is a blocking child-process round trip. Hosts that must stay
/// responsive poll renders from worker threads and share the adapter by reference; a request
/// issued from another thread while a render is in flight makes that render stale.
#[derive(Debug, Default)]
pub struct RenderAdapter<E> {
    engine: E,
    generation: AtomicU64,
}

impl<E: LayoutEngine> RenderAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            generation: AtomicU64::new(0),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Takes a fresh ticket and renders `dot`. Blocks the polling thread for the engine call.
    pub async fn render(&self, dot: &str) -> Option<RenderedDiagram> {
        let ticket = self.begin();
        self.render_with(ticket, dot).await
    }

    pub async fn render_with(&self, ticket: RenderTicket, dot: &str) -> Option<RenderedDiagram> {
        let result = self.try_render(dot);
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.0,
                "discarding render superseded by a newer request"
            );
            return None;
        }
        match result {
            Ok(diagram) => Some(diagram),
            Err(err) => {
                tracing::warn!(error = %err, "rendering failed");
                None
            }
        }
    }

    /// Engine output parsed into a [`RenderedDiagram`], errors preserved.
    pub fn try_render(&self, dot: &str) -> Result<RenderedDiagram, EngineError> {
        let svg = self.engine.render_svg(dot)?;
        Ok(RenderedDiagram::parse(svg)?)
    }
}
