//! Graphviz DOT encoders.
//!
//! Two dialects are produced, each feeding a different consumer:
//! - [`DotDialect::Bare`] (dialect A): bare identifiers, edges tagged `id="src=>dst"`, cells
//!   carrying a placeholder `href` so the SVG output keeps an addressable group per verb row.
//! - [`DotDialect::Quoted`] (dialect B): quoted identifiers, untagged edges.
//!
//! Each dialect owns its node and edge emission; only the header is shared.

mod bare;
mod quoted;

use std::borrow::Cow;
use std::str::FromStr;

use crate::graph::CallGraph;
use crate::{Error, Result};

pub use bare::render_bare;
pub use quoted::render_quoted;

pub(crate) const RANKSEP: &str = "2.0";
pub(crate) const HEADER_BGCOLOR: &str = "#e0e7ff";
pub(crate) const CALL_INDICATOR: &str = r##"<font color="#fb7185"> &#8594;</font>"##;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DotDialect {
    #[default]
    Bare,
    Quoted,
}

impl FromStr for DotDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "bare" | "dot-a" => Ok(Self::Bare),
            "b" | "quoted" | "dot-b" => Ok(Self::Quoted),
            other => Err(Error::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

pub fn render_dot(graph: &CallGraph, dialect: DotDialect) -> String {
    match dialect {
        DotDialect::Bare => render_bare(graph),
        DotDialect::Quoted => render_quoted(graph),
    }
}

/// Replaces `]` with its HTML entity; every other character is left as-is.
pub fn escape_label(text: &str) -> Cow<'_, str> {
    if text.contains(']') {
        Cow::Owned(text.replace(']', "&#93;"))
    } else {
        Cow::Borrowed(text)
    }
}

pub(crate) fn push_header(out: &mut String) {
    out.push_str("digraph erd {\n");
    out.push_str("  graph [rankdir = \"LR\"];\n");
    out.push_str("  node [fontsize = \"14\" fontname = \"Helvetica\" shape = \"plaintext\"];\n");
    out.push_str("  edge [];\n");
    out.push_str("  ranksep = ");
    out.push_str(RANKSEP);
    out.push('\n');
}
