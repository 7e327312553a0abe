#![forbid(unsafe_code)]

//! Module/verb schema model, call-graph builder and diagram encoders (headless).
//!
//! Pipeline: [`Schema`] → [`graph::build_call_graph`] → [`dot::render_dot`] or
//! [`flowchart::render_flowchart`]. The declaration-level graph
//! ([`graph::build_decl_graph`]) feeds [`presentation::elements`] for interactive canvases.
//!
//! All work is synchronous and pure; nothing here performs layout or I/O.

pub mod config;
pub mod dot;
pub mod error;
pub mod flowchart;
pub mod geom;
pub mod graph;
pub mod presentation;
pub mod schema;
pub mod theme;

use std::str::FromStr;

pub use config::VerbvizConfig;
pub use dot::DotDialect;
pub use error::{Error, Result};
pub use graph::{BuildOptions, CallGraph, DeclGraph, build_call_graph, build_decl_graph};
pub use schema::{Decl, DeclKind, Metadata, Module, Ref, Schema};
pub use theme::Theme;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagramFormat {
    #[default]
    DotA,
    DotB,
    Flowchart,
}

impl DiagramFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DotA => "dot-a",
            Self::DotB => "dot-b",
            Self::Flowchart => "flowchart",
        }
    }
}

impl From<DotDialect> for DiagramFormat {
    fn from(dialect: DotDialect) -> Self {
        match dialect {
            DotDialect::Bare => Self::DotA,
            DotDialect::Quoted => Self::DotB,
        }
    }
}

impl FromStr for DiagramFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flowchart" | "mermaid" => Ok(Self::Flowchart),
            other => other.parse::<DotDialect>().map(Self::from),
        }
    }
}

/// Builds the call graph and encodes it in `format`.
pub fn generate(schema: &Schema, format: DiagramFormat, options: &BuildOptions) -> String {
    let graph = build_call_graph(schema, options);
    match format {
        DiagramFormat::DotA => dot::render_dot(&graph, DotDialect::Bare),
        DiagramFormat::DotB => dot::render_dot(&graph, DotDialect::Quoted),
        DiagramFormat::Flowchart => flowchart::render_flowchart(&graph),
    }
}

#[cfg(test)]
mod tests;
