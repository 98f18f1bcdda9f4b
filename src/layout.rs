//! # Layout Chain Module
//!
//! A layout contributes middleware to its own path segment and every
//! descendant. For any leaf, the chain of applicable layouts is the ordered
//! sequence of ancestors (inclusive) that carry a layout source, outermost
//! first. Nodes without a layout are skipped without breaking the chain.

use crate::scan::LAYOUT_FN;
use crate::tree::{NodeId, RouteTree};
use std::path::PathBuf;

/// One applicable layout for a route, as consumed by the code generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Layout source file.
    pub source: PathBuf,
    /// Generated module alias, unique per layout directory.
    pub alias: String,
    /// Exported middleware function name.
    pub func: &'static str,
}

/// Build the root-to-leaf layout chain for a node.
///
/// The returned entries are ordered outermost (closest to the tree root)
/// first, which is also middleware execution order. The generator wraps them
/// in reverse so the innermost layout sits closest to the handler.
pub fn layout_chain(tree: &RouteTree, id: NodeId) -> Vec<LayoutEntry> {
    tree.ancestry(id)
        .into_iter()
        .filter_map(|ancestor| {
            let node = tree.node(ancestor);
            node.layout_file.as_ref().map(|source| LayoutEntry {
                source: source.clone(),
                alias: node_alias(tree, ancestor, "layout"),
                func: LAYOUT_FN,
            })
        })
        .collect()
}

/// Derive the module alias for a node's handler or layout file.
///
/// Joins the sanitized segment fragments from the branch down to the node,
/// then appends the file stem (`page`, `route`, or `layout`). Dynamic and
/// catch-all segments contribute their bare parameter name, so
/// `pages/users/[id]/page.rs` becomes `pages_users_id_page`.
pub fn node_alias(tree: &RouteTree, id: NodeId, stem: &str) -> String {
    let mut parts: Vec<String> = tree
        .ancestry(id)
        .into_iter()
        .skip(1) // the scan root contributes nothing
        .map(|ancestor| sanitize_ident(tree.node(ancestor).segment.ident_fragment()))
        .collect();
    parts.push(stem.to_string());
    parts.join("_")
}

/// Reduce an arbitrary path fragment to a valid identifier fragment.
pub fn sanitize_ident(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
