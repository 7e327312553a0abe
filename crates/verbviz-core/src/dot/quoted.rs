use std::fmt::Write as _;

use super::{CALL_INDICATOR, HEADER_BGCOLOR, escape_label, push_header};
use crate::graph::CallGraph;

const TABLE_WIDTH: u32 = 200;

/// Dialect B: quoted identifiers and untagged edges.
pub fn render_quoted(graph: &CallGraph) -> String {
    let mut out = String::new();
    push_header(&mut out);

    for module in &graph.modules {
        let _ = writeln!(
            out,
            "  \"{}\" [label=<<table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"4\" width=\"{TABLE_WIDTH}\">",
            module.name
        );
        let _ = writeln!(
            out,
            "    <tr><td bgcolor=\"{HEADER_BGCOLOR}\"><b>{}</b></td></tr>",
            escape_label(&module.name)
        );
        for verb in &module.verbs {
            let _ = write!(
                out,
                "    <tr><td port=\"{}\" id=\"{}\" align=\"left\">{}",
                escape_label(&verb.name),
                escape_label(&verb.id()),
                escape_label(&verb.name),
            );
            if verb.has_outbound_calls {
                out.push_str(CALL_INDICATOR);
            }
            out.push_str("</td></tr>\n");
        }
        out.push_str("  </table>>];\n");
    }

    for edge in &graph.edges {
        let _ = writeln!(
            out,
            "  \"{}\":\"{}\" -> \"{}\":\"{}\";",
            edge.source.module, edge.source.name, edge.target.module, edge.target.name
        );
    }

    out.push_str("}\n");
    out
}
