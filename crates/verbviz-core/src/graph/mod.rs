//! Call graph derived from a schema snapshot.
//!
//! Modules are visited in reverse schema order so that root/feature modules, which the data
//! layer lists last, lead the emitted diagram. Every encoder in this crate depends on that order
//! for deterministic output.

mod decl;

pub use decl::{DeclEdge, DeclEdgeKind, DeclGraph, DeclNode, DeclNodeKind, build_decl_graph};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::schema::{Module, Ref, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Modules removed from the graph, together with every call into them.
    pub exclude_modules: Vec<String>,
}

impl BuildOptions {
    pub fn excluding<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude_modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn includes(&self, module: &str) -> bool {
        !self.exclude_modules.iter().any(|m| m == module)
    }
}

/// Module-level (coarse) graph: one node per module, one row per verb, one edge per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallGraph {
    pub modules: Vec<ModuleNode>,
    pub edges: Vec<CallEdge>,
}

impl CallGraph {
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    /// Edges keyed by source verb id, each list in edge order.
    pub fn edges_by_source(&self) -> FxHashMap<String, Vec<&CallEdge>> {
        let mut by_source: FxHashMap<String, Vec<&CallEdge>> = FxHashMap::default();
        for edge in &self.edges {
            by_source.entry(edge.source_id()).or_default().push(edge);
        }
        by_source
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleNode {
    pub name: String,
    pub verbs: Vec<VerbNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbNode {
    pub module: String,
    pub name: String,
    pub has_outbound_calls: bool,
}

impl VerbNode {
    /// Element id used to find the verb's row in rendered output.
    pub fn id(&self) -> String {
        qualified_id(&self.module, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallEdge {
    pub source: Ref,
    pub target: Ref,
}

impl CallEdge {
    pub fn source_id(&self) -> String {
        qualified_id(&self.source.module, &self.source.name)
    }

    pub fn target_id(&self) -> String {
        qualified_id(&self.target.module, &self.target.name)
    }

    /// Synthesized `source=>target` id.
    pub fn id(&self) -> String {
        format!("{}=>{}", self.source_id(), self.target_id())
    }
}

pub fn qualified_id(module: &str, name: &str) -> String {
    if name.is_empty() {
        return module.to_string();
    }
    format!("{module}.{name}")
}

pub fn build_call_graph(schema: &Schema, options: &BuildOptions) -> CallGraph {
    let known = known_modules(schema, options);
    let mut graph = CallGraph::default();

    for module in included_modules_rev(schema, options) {
        let mut node = ModuleNode {
            name: module.name.clone(),
            verbs: Vec::new(),
        };

        for verb in module.verbs() {
            node.verbs.push(VerbNode {
                module: module.name.clone(),
                name: verb.name.clone(),
                has_outbound_calls: verb.has_outbound_calls(),
            });

            for call in verb.calls() {
                if call.module.is_empty() || !known.contains(call.module.as_str()) {
                    tracing::debug!(
                        source = %qualified_id(&module.name, &verb.name),
                        target = %call,
                        "dropping call to unknown module"
                    );
                    continue;
                }
                graph.edges.push(CallEdge {
                    source: Ref::new(module.name.as_str(), verb.name.as_str()),
                    target: call.clone(),
                });
            }
        }

        graph.modules.push(node);
    }

    graph
}

pub(crate) fn known_modules<'a>(schema: &'a Schema, options: &BuildOptions) -> FxHashSet<&'a str> {
    schema
        .modules
        .iter()
        .filter(|m| options.includes(&m.name))
        .map(|m| m.name.as_str())
        .collect()
}

pub(crate) fn included_modules_rev<'a>(
    schema: &'a Schema,
    options: &'a BuildOptions,
) -> impl Iterator<Item = &'a Module> + 'a {
    schema
        .modules
        .iter()
        .rev()
        .filter(move |m| options.includes(&m.name))
}
