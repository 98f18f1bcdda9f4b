//! # Route Tree Module
//!
//! The route tree mirrors the scanned application directory layout. Each
//! [`RouteNode`] represents one directory; URL patterns and layout chains are
//! derived from a node's ancestry.
//!
//! ## Representation
//!
//! Nodes live in a flat arena owned by [`RouteTree`]. Children hold arena
//! indices ([`NodeId`]) in scan order, and every node keeps a parent index for
//! upward traversal. Parent links are lookup pointers only; ownership flows
//! strictly downward from the arena.

use std::path::{Path, PathBuf};

/// Index of a node inside a [`RouteTree`] arena.
pub type NodeId = usize;

/// Directory name of the page-handler branch. Elided from generated URLs.
pub const PAGES_DIR: &str = "pages";
/// Directory name of the API-handler branch. Retained in generated URLs.
pub const API_DIR: &str = "api";

/// One URL segment derived from a directory name.
///
/// `users` is a literal, `[id]` a dynamic parameter, `[...slug]` a catch-all
/// capturing every remaining path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

impl Segment {
    /// Parse a directory name into a segment.
    ///
    /// A name wrapped in `[` `]` becomes a parameter; if the inner name starts
    /// with `...` the segment captures all remaining components and the marker
    /// is stripped before deriving the parameter identifier.
    pub fn parse(dir_name: &str) -> Segment {
        if let Some(inner) = dir_name.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if let Some(name) = inner.strip_prefix("...") {
                return Segment::CatchAll(name.to_string());
            }
            return Segment::Param(inner.to_string());
        }
        Segment::Literal(dir_name.to_string())
    }

    /// The routing token this segment contributes to a URL pattern.
    pub fn url_token(&self) -> String {
        match self {
            Segment::Literal(name) => name.clone(),
            Segment::Param(name) => format!("{{{name}}}"),
            Segment::CatchAll(name) => format!("{{{name}...}}"),
        }
    }

    /// Parameter name for dynamic and catch-all segments.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) => Some(name),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Segment::Param(_))
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAll(_))
    }

    /// Identifier fragment used when building module aliases. Dynamic and
    /// catch-all segments contribute their bare parameter name.
    pub fn ident_fragment(&self) -> &str {
        match self {
            Segment::Literal(name) => name,
            Segment::Param(name) | Segment::CatchAll(name) => name,
        }
    }
}

/// The fixed set of HTTP verbs a handler file may export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Map an exported function name onto a verb. Unrecognized names are
    /// ignored by the scanner, never errors.
    pub fn from_ident(name: &str) -> Option<Method> {
        match name {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "PATCH" => Some(Method::Patch),
            _ => None,
        }
    }

    /// Verb name as exported by handler files.
    pub fn verb(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }

    /// Name of the per-verb registration method on `loam::Router`.
    pub fn router_fn(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
            Method::Patch => "patch",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// One directory in the scanned application tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    /// Filesystem path of the directory, unique per node.
    pub path: PathBuf,
    /// URL segment derived from the directory name.
    pub segment: Segment,
    /// Parent arena index. `None` only for the scan root.
    pub parent: Option<NodeId>,
    /// Child arena indices in scan order.
    pub children: Vec<NodeId>,
    /// Page or API handler source, if the directory carries one.
    pub handler_file: Option<PathBuf>,
    /// Layout source, if the directory carries one.
    pub layout_file: Option<PathBuf>,
    /// Verbs exported by the handler file, in declaration order.
    pub methods: Vec<Method>,
    /// Directory contains a `page.rs`.
    pub is_page: bool,
    /// Directory contains a `route.rs`.
    pub is_api: bool,
    /// The layout file exports `pub fn layout`.
    pub has_layout_fn: bool,
}

impl RouteNode {
    pub fn new(path: impl Into<PathBuf>, segment: Segment) -> Self {
        RouteNode {
            path: path.into(),
            segment,
            parent: None,
            children: Vec::new(),
            handler_file: None,
            layout_file: None,
            methods: Vec::new(),
            is_page: false,
            is_api: false,
            has_layout_fn: false,
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler_file.is_some()
    }

    pub fn has_layout(&self) -> bool {
        self.layout_file.is_some()
    }
}

/// Arena-backed route tree produced by one scan. Built once, consumed
/// read-only by the validator, layout chain builder, and code generator.
#[derive(Debug, Clone)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
}

impl RouteTree {
    /// Create a tree containing only the scan-root node. A missing scan root
    /// yields exactly this: an empty tree, not an error.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let segment = Segment::Literal(
            root_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        RouteTree {
            nodes: vec![RouteNode::new(root_path, segment)],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Attach a node under `parent`, returning its arena index.
    pub fn add_child(&mut self, parent: NodeId, mut node: RouteNode) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut RouteNode {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Ancestry from the scan root down to `id`, inclusive.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.nodes[node_id].parent;
        }
        chain.reverse();
        chain
    }

    /// Pre-order traversal of every node, root first, children in scan order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.nodes[id].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Whether any node in the subtree rooted at `id` (excluding `id` itself)
    /// carries a handler.
    pub fn descendant_has_handler(&self, id: NodeId) -> bool {
        self.nodes[id].children.iter().any(|&child| {
            self.nodes[child].has_handler() || self.descendant_has_handler(child)
        })
    }

    /// Derive the public URL pattern for a node.
    ///
    /// Ancestor segments are concatenated root to node. The scan root itself
    /// contributes nothing, the `pages` branch segment is elided, and the
    /// `api` branch segment is retained.
    pub fn url_pattern(&self, id: NodeId) -> String {
        let chain = self.ancestry(id);
        let mut tokens = Vec::new();
        for (depth, &node_id) in chain.iter().enumerate() {
            if depth == 0 {
                continue;
            }
            let segment = &self.nodes[node_id].segment;
            if depth == 1 {
                if let Segment::Literal(name) = segment {
                    if name == PAGES_DIR {
                        continue;
                    }
                }
            }
            tokens.push(segment.url_token());
        }
        if tokens.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", tokens.join("/"))
        }
    }

    /// Collect every handler-bearing node, independent of depth.
    pub fn handler_nodes(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.nodes[id].has_handler())
            .collect()
    }
}

/// Validate a dynamic-segment parameter name.
///
/// A name is valid iff it is non-empty, its first character is a letter or
/// underscore, and every character is a letter, digit, or underscore. Letter
/// and digit classification is full Unicode, not ASCII.
pub fn validate_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
