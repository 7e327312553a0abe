//! Flowchart markup encoder (`flowchart LR` with one subgraph per module).
//!
//! Lines are grouped per module in an insertion-ordered map of ordered sets, so a line repeated
//! within one module is emitted once. The DOT encoders keep duplicate edges instead.

use indexmap::{IndexMap, IndexSet};

use crate::graph::{CallGraph, VerbNode};

const INDENT: &str = "    ";

/// Module name to its rendered lines, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowchartGroups {
    groups: IndexMap<String, IndexSet<String>>,
}

impl FlowchartGroups {
    pub fn from_graph(graph: &CallGraph) -> Self {
        let mut groups = Self::default();
        let by_source = graph.edges_by_source();
        for module in &graph.modules {
            groups.ensure(&module.name);
            for verb in &module.verbs {
                let source = verb.id();
                match by_source.get(&source) {
                    Some(edges) => {
                        for edge in edges {
                            groups.insert(&module.name, format!("{source}-->{}", edge.target_id()));
                        }
                    }
                    None => {
                        groups.insert(&module.name, declaration_line(verb));
                    }
                }
            }
        }
        groups
    }

    pub fn ensure(&mut self, module: &str) {
        if !self.groups.contains_key(module) {
            self.groups.insert(module.to_string(), IndexSet::new());
        }
    }

    /// Returns `false` when the line was already present for `module`.
    pub fn insert(&mut self, module: &str, line: String) -> bool {
        self.ensure(module);
        match self.groups.get_mut(module) {
            Some(lines) => lines.insert(line),
            None => false,
        }
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn lines(&self, module: &str) -> Option<&IndexSet<String>> {
        self.groups.get(module)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("flowchart LR\n");
        for (module, lines) in &self.groups {
            out.push_str(INDENT);
            out.push_str("subgraph ");
            out.push_str(module);
            out.push('\n');
            for line in lines {
                out.push_str(INDENT);
                out.push_str(INDENT);
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(INDENT);
            out.push_str("end\n");
        }
        out
    }
}

pub fn render_flowchart(graph: &CallGraph) -> String {
    FlowchartGroups::from_graph(graph).render()
}

fn declaration_line(verb: &VerbNode) -> String {
    format!("{}[{}]", verb.id(), escape_flowchart_label(&verb.name))
}

/// Replaces `]` with the `#93;` entity code; labels sit inside `[...]` node shapes.
pub fn escape_flowchart_label(text: &str) -> String {
    text.replace(']', "#93;")
}
