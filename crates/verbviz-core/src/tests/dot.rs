use super::count_lines_containing;
use crate::dot::{escape_label, render_bare, render_quoted};
use crate::*;
use serde_json::json;

fn node_statement_order(dot: &str, names: &[&str], quoted: bool) -> Vec<usize> {
    names
        .iter()
        .map(|name| {
            let needle = if quoted {
                format!("  \"{name}\" [label=<")
            } else {
                format!("  {name} [label=<")
            };
            dot.find(&needle)
                .unwrap_or_else(|| panic!("missing node statement for {name}"))
        })
        .collect()
}

#[test]
fn header_carries_global_layout_hints() {
    let graph = build_call_graph(&super::echo_time(), &BuildOptions::default());
    for dot in [render_bare(&graph), render_quoted(&graph)] {
        assert!(dot.starts_with("digraph erd {\n  graph [rankdir = \"LR\"];\n"));
        assert!(dot.contains("shape = \"plaintext\""));
        assert!(dot.contains("\n  edge [];\n"));
        assert!(dot.contains("\n  ranksep = 2.0\n"));
        assert!(dot.trim_end().ends_with('}'));
    }
}

#[test]
fn echo_time_dialect_a() {
    let dot = generate(&super::echo_time(), DiagramFormat::DotA, &BuildOptions::default());
    let order = node_statement_order(&dot, &["time", "echo"], false);
    assert!(order[0] < order[1], "time must precede echo:\n{dot}");

    assert_eq!(count_lines_containing(&dot, " -> "), 1);
    assert!(dot.contains("  echo:echo -> time:now [id=\"echo.echo=>time.now\"];\n"));
    assert!(dot.contains("id=\"echo.echo\" href=\" \""));
    assert!(dot.contains("width=\"250\""));
}

#[test]
fn echo_time_dialect_b() {
    let dot = generate(&super::echo_time(), DiagramFormat::DotB, &BuildOptions::default());
    let order = node_statement_order(&dot, &["time", "echo"], true);
    assert!(order[0] < order[1], "time must precede echo:\n{dot}");

    assert_eq!(count_lines_containing(&dot, " -> "), 1);
    assert!(dot.contains("  \"echo\":\"echo\" -> \"time\":\"now\";\n"));
    assert!(!dot.contains("=>"));
    assert!(!dot.contains("href"));
    assert!(dot.contains("width=\"200\""));
}

#[test]
fn nodes_precede_edges() {
    let graph = build_call_graph(&super::shop(), &BuildOptions::default());
    for dot in [render_bare(&graph), render_quoted(&graph)] {
        let last_node = dot.rfind("</table>>];").unwrap();
        let first_edge = dot.find(" -> ").unwrap();
        assert!(last_node < first_edge);
    }
}

#[test]
fn node_order_reverses_module_order_in_both_dialects() {
    let graph = build_call_graph(&super::shop(), &BuildOptions::default());
    let names = ["checkout", "inventory", "builtin"];

    let bare = node_statement_order(&render_bare(&graph), &names, false);
    assert!(bare.windows(2).all(|w| w[0] < w[1]));

    let quoted = node_statement_order(&render_quoted(&graph), &names, true);
    assert!(quoted.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn edge_count_matches_call_references_without_dedup() {
    let graph = build_call_graph(&super::shop(), &BuildOptions::default());
    // ledger.record targets a module missing from the snapshot.
    assert_eq!(count_lines_containing(&render_bare(&graph), " -> "), 3);
    assert_eq!(count_lines_containing(&render_quoted(&graph), " -> "), 3);
}

#[test]
fn zero_calls_yield_no_edges_but_one_row_per_verb() {
    let schema = Schema::from_value(json!({
        "modules": [
            { "name": "a", "verbs": [ { "name": "one" }, { "name": "two" } ] },
            { "name": "b", "verbs": [ { "name": "three" } ] }
        ]
    }))
    .unwrap();
    let graph = build_call_graph(&schema, &BuildOptions::default());
    for dot in [render_bare(&graph), render_quoted(&graph)] {
        assert_eq!(count_lines_containing(&dot, " -> "), 0);
        assert_eq!(count_lines_containing(&dot, "port=\""), 3);
        assert!(dot.contains("id=\"a.one\""));
        assert!(dot.contains("id=\"b.three\""));
    }
}

#[test]
fn outbound_rows_carry_the_indicator() {
    let graph = build_call_graph(&super::echo_time(), &BuildOptions::default());
    for dot in [render_bare(&graph), render_quoted(&graph)] {
        let echo_row = dot.lines().find(|l| l.contains("id=\"echo.echo\"")).unwrap();
        let now_row = dot.lines().find(|l| l.contains("id=\"time.now\"")).unwrap();
        assert!(echo_row.contains("&#8594;"));
        assert!(!now_row.contains("&#8594;"));
    }
}

#[test]
fn closing_bracket_is_the_only_escaped_character() {
    assert_eq!(escape_label("list[int]"), "list[int&#93;");
    assert_eq!(escape_label("a<b>&\"c\""), "a<b>&\"c\"");
    assert!(matches!(escape_label("plain"), std::borrow::Cow::Borrowed(_)));

    let schema = Schema::from_value(json!({
        "modules": [ { "name": "m", "verbs": [ { "name": "get]&<x>" } ] } ]
    }))
    .unwrap();
    let graph = build_call_graph(&schema, &BuildOptions::default());
    for dot in [render_bare(&graph), render_quoted(&graph)] {
        let row = dot.lines().find(|l| l.contains("port=")).unwrap();
        assert!(row.contains(">get&#93;&<x></td>"), "{row}");
        assert!(!row.contains(']'));
    }
}

#[test]
fn non_identifier_names_are_raw_in_dialect_a_and_quoted_in_dialect_b() {
    let schema = Schema::from_value(json!({
        "modules": [
            { "name": "my-mod", "verbs": [ { "name": "do-it", "metadata": [
                { "tag": "calls", "calls": [ { "module": "my-mod", "name": "do-it" } ] }
            ] } ] }
        ]
    }))
    .unwrap();
    let graph = build_call_graph(&schema, &BuildOptions::default());

    let a = render_bare(&graph);
    assert!(a.contains("  my-mod [label=<"), "{a}");
    assert!(a.contains("  my-mod:do-it -> my-mod:do-it"), "{a}");

    let b = render_quoted(&graph);
    assert!(b.contains("  \"my-mod\" [label=<"), "{b}");
    assert!(b.contains("  \"my-mod\":\"do-it\" -> \"my-mod\":\"do-it\";"), "{b}");
}
