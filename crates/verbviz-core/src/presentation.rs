//! Canvas element definitions for the interactive (non-DOT) graph view.

use serde::Serialize;

use crate::graph::{DeclEdge, DeclEdgeKind, DeclGraph, DeclNode, DeclNodeKind};
use crate::schema::DeclKind;
use crate::theme::{Theme, border_color, edge_color, handle_color, palette};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group", content = "data", rename_all = "lowercase")]
pub enum Element {
    Nodes(NodeData),
    Edges(EdgeData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type_kind: Option<DeclKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub background_color: String,
    pub border_color: String,
    pub handle_color: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: &'static str,
    pub line_color: &'static str,
}

pub fn node_style(node: &DeclNode, theme: Theme, selected: bool) -> NodeData {
    let (node_type, kind, background, border) = match node.kind {
        DeclNodeKind::Group => {
            let group = palette(theme).group;
            (
                "groupNode",
                None,
                group.to_string(),
                handle_color(false).to_string(),
            )
        }
        DeclNodeKind::Decl(kind) => (
            "node",
            Some(kind),
            palette(theme).fill(kind).to_string(),
            border_color(kind, theme),
        ),
    };

    NodeData {
        id: node.id.clone(),
        label: node.label.clone(),
        node_type,
        node_type_kind: kind,
        parent: node.parent.clone(),
        background_color: background,
        border_color: border,
        handle_color: handle_color(selected),
        selected,
    }
}

/// An edge is highlighted when either endpoint is the selected node.
pub fn edge_style(edge: &DeclEdge, selected: Option<&str>) -> EdgeData {
    let highlighted = selected.is_some_and(|id| edge.source == id || edge.target == id);
    EdgeData {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        edge_type: match edge.kind {
            DeclEdgeKind::Call => "childConnection",
            DeclEdgeKind::ModuleConnection => "moduleConnection",
        },
        line_color: edge_color(highlighted),
    }
}

pub fn elements(graph: &DeclGraph, theme: Theme, selected: Option<&str>) -> Vec<Element> {
    let nodes = graph.nodes.iter().map(|node| {
        let is_selected = selected == Some(node.id.as_str());
        Element::Nodes(node_style(node, theme, is_selected))
    });
    let edges = graph
        .edges
        .iter()
        .map(|edge| Element::Edges(edge_style(edge, selected)));
    nodes.chain(edges).collect()
}
