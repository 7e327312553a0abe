use std::fmt::Write as _;

use super::{CALL_INDICATOR, HEADER_BGCOLOR, escape_label, push_header};
use crate::graph::CallGraph;

const TABLE_WIDTH: u32 = 250;

/// Dialect A: bare identifiers, id-tagged edges, placeholder hyperlinks on verb rows.
///
/// Module and verb names are written unquoted as node ids and ports, so they must already be
/// valid DOT identifiers. A name such as `my-mod` yields DOT that Graphviz rejects; use
/// [`super::render_quoted`] for schemas with such names.
pub fn render_bare(graph: &CallGraph) -> String {
    let mut out = String::new();
    push_header(&mut out);

    for module in &graph.modules {
        let _ = writeln!(
            out,
            "  {} [label=<<table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"4\" width=\"{TABLE_WIDTH}\">",
            module.name
        );
        let _ = writeln!(
            out,
            "    <tr><td bgcolor=\"{HEADER_BGCOLOR}\"><b>{}</b></td></tr>",
            escape_label(&module.name)
        );
        for verb in &module.verbs {
            let indicator = if verb.has_outbound_calls {
                CALL_INDICATOR
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "    <tr><td port=\"{port}\" id=\"{id}\" href=\" \" align=\"left\">{label}{indicator}</td></tr>",
                port = escape_label(&verb.name),
                id = escape_label(&verb.id()),
                label = escape_label(&verb.name),
            );
        }
        out.push_str("  </table>>];\n");
    }

    for edge in &graph.edges {
        let _ = writeln!(
            out,
            "  {}:{} -> {}:{} [id=\"{}\"];",
            edge.source.module,
            edge.source.name,
            edge.target.module,
            edge.target.name,
            edge.id()
        );
    }

    out.push_str("}\n");
    out
}
