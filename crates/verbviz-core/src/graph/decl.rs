use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use serde::Serialize;

use super::{BuildOptions, known_modules, included_modules_rev, qualified_id};
use crate::schema::{DeclKind, Schema};

/// Declaration-level (fine) graph used by the interactive canvas.
///
/// Module nodes act as compound parents; every declaration is a child node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeclGraph {
    pub nodes: Vec<DeclNode>,
    pub edges: Vec<DeclEdge>,
}

impl DeclGraph {
    pub fn node(&self, id: &str) -> Option<&DeclNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclNodeKind {
    Group,
    Decl(DeclKind),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclNode {
    pub id: String,
    pub label: String,
    pub kind: DeclNodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub has_outbound_calls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclEdgeKind {
    Call,
    ModuleConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: DeclEdgeKind,
}

pub fn build_decl_graph(schema: &Schema, options: &BuildOptions) -> DeclGraph {
    let known = known_modules(schema, options);
    let mut graph = DeclGraph::default();
    let mut connections: IndexSet<(String, String)> = IndexSet::new();

    for module in included_modules_rev(schema, options) {
        graph.nodes.push(DeclNode {
            id: module.name.clone(),
            label: module.name.clone(),
            kind: DeclNodeKind::Group,
            parent: None,
            has_outbound_calls: false,
        });

        for decl in &module.decls {
            let id = qualified_id(&module.name, &decl.name);
            graph.nodes.push(DeclNode {
                id: id.clone(),
                label: decl.name.clone(),
                kind: DeclNodeKind::Decl(decl.kind),
                parent: Some(module.name.clone()),
                has_outbound_calls: decl.is_verb() && decl.has_outbound_calls(),
            });

            if !decl.is_verb() {
                continue;
            }

            let mut seen: FxHashSet<String> = FxHashSet::default();
            for call in decl.calls() {
                if call.module.is_empty() || !known.contains(call.module.as_str()) {
                    continue;
                }
                let target = qualified_id(&call.module, &call.name);
                let edge_id = format!("edge-{id}->{target}");
                if !seen.insert(edge_id.clone()) {
                    continue;
                }
                graph.edges.push(DeclEdge {
                    id: edge_id,
                    source: id.clone(),
                    target,
                    kind: DeclEdgeKind::Call,
                });

                if call.module != module.name {
                    let (a, b) = if module.name <= call.module {
                        (module.name.clone(), call.module.clone())
                    } else {
                        (call.module.clone(), module.name.clone())
                    };
                    connections.insert((a, b));
                }
            }
        }
    }

    for (a, b) in connections {
        graph.edges.push(DeclEdge {
            id: format!("module-{a}->{b}"),
            source: a,
            target: b,
            kind: DeclEdgeKind::ModuleConnection,
        });
    }

    graph
}
