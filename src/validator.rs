//! # Validator Module
//!
//! Walks a finished route tree and enforces its structural invariants before
//! any code is generated.
//!
//! ## Checks Performed
//!
//! 1. **Parameter names** - dynamic and catch-all parameters must be valid
//!    identifiers (Unicode letters, digits, underscores)
//! 2. **Catch-all placement** - a catch-all must be the last segment with a
//!    handler; at most one catch-all per sibling set
//! 3. **Duplicate routes** - two siblings with the same segment may not both
//!    carry handlers
//! 4. **Method presence** - a handler file must export at least one verb
//! 5. **Layout exports** - a layout file must export `pub fn layout`
//!
//! Issues are aggregated in deterministic pre-order; [`ensure_valid`] folds
//! them into a single descriptive error. Generation never proceeds while any
//! issue exists.

use crate::tree::{validate_param_name, NodeId, RouteTree};
use std::collections::BTreeMap;

/// A structural problem found in the route tree.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Where the issue occurred, as a derived URL pattern or directory path.
    pub location: String,
    /// Issue category (e.g. "duplicate_route", "catch_all").
    pub kind: String,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Validate every node of the tree, aggregating issues in pre-order.
pub fn validate_tree(tree: &RouteTree) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for id in tree.walk() {
        check_node(tree, id, &mut issues);
        check_children(tree, id, &mut issues);
    }
    issues
}

/// Fail with a single descriptive error if the tree has any issue.
pub fn ensure_valid(tree: &RouteTree) -> anyhow::Result<()> {
    let issues = validate_tree(tree);
    if issues.is_empty() {
        return Ok(());
    }
    let report = issues
        .iter()
        .map(ValidationIssue::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    anyhow::bail!(
        "route tree validation failed with {} issue(s):\n{report}",
        issues.len()
    )
}

fn check_node(tree: &RouteTree, id: NodeId, issues: &mut Vec<ValidationIssue>) {
    let node = tree.node(id);
    let location = tree.url_pattern(id);

    if let Some(name) = node.segment.param_name() {
        if !validate_param_name(name) {
            issues.push(ValidationIssue::new(
                location.clone(),
                "param_name",
                format!(
                    "invalid parameter name {name:?}: must start with a letter or underscore and contain only letters, digits, or underscores"
                ),
            ));
        }
    }

    if node.segment.is_catch_all() && tree.descendant_has_handler(id) {
        issues.push(ValidationIssue::new(
            location.clone(),
            "catch_all",
            "catch-all must be the last segment: descendants of a catch-all may not carry handlers",
        ));
    }

    if node.has_handler() && node.methods.is_empty() {
        let handler = node
            .handler_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        issues.push(ValidationIssue::new(
            location.clone(),
            "no_methods",
            format!("handler file {handler} exports no HTTP verb functions"),
        ));
    }

    if node.has_layout() && !node.has_layout_fn {
        let layout = node
            .layout_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        issues.push(ValidationIssue::new(
            location,
            "layout",
            format!("layout file {layout} does not export `pub fn layout`"),
        ));
    }
}

fn check_children(tree: &RouteTree, id: NodeId, issues: &mut Vec<ValidationIssue>) {
    let node = tree.node(id);

    let catch_alls: Vec<NodeId> = node
        .children
        .iter()
        .copied()
        .filter(|&child| tree.node(child).segment.is_catch_all())
        .collect();
    if catch_alls.len() > 1 {
        issues.push(ValidationIssue::new(
            tree.url_pattern(id),
            "catch_all",
            format!(
                "{} catch-all segments under one parent; at most one is allowed",
                catch_alls.len()
            ),
        ));
    }

    // Group siblings by URL token; two handler-bearing siblings sharing a
    // token make the route ambiguous. Static vs dynamic overlap is left to
    // the runtime multiplexer's precedence rules.
    let mut by_token: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
    for &child in &node.children {
        by_token
            .entry(tree.node(child).segment.url_token())
            .or_default()
            .push(child);
    }
    for (token, siblings) in by_token {
        let with_handlers = siblings
            .iter()
            .filter(|&&child| tree.node(child).has_handler())
            .count();
        if with_handlers > 1 {
            issues.push(ValidationIssue::new(
                tree.url_pattern(siblings[0]),
                "duplicate_route",
                format!("duplicate route: {with_handlers} sibling segments {token:?} carry handlers"),
            ));
        }
    }
}
