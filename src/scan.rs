//! # Scanner Module
//!
//! Walks an application directory and reconstructs the implicit route
//! hierarchy from filesystem conventions.
//!
//! ## Conventions
//!
//! | File / directory | Meaning |
//! |---|---|
//! | `pages/**` | page-handler subtree, branch name elided from URLs |
//! | `api/**` | API-handler subtree, branch name retained |
//! | `page.rs` / `route.rs` | handler source; exported `GET`/`POST`/`PUT`/`DELETE`/`PATCH` functions become registered methods |
//! | `layout.rs` | layout middleware source for the segment and all descendants |
//! | `[name]` | dynamic segment bound to parameter `name` |
//! | `[...name]` | catch-all segment bound to parameter `name` |
//!
//! Handler and layout sources are analyzed statically with `syn`; nothing is
//! ever loaded or executed. Directories contributing neither a handler nor a
//! layout anywhere in their subtree are pruned silently.

use crate::tree::{Method, RouteNode, RouteTree, Segment, API_DIR, PAGES_DIR};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Recognized page-handler filename.
pub const PAGE_FILE: &str = "page.rs";
/// Recognized API-handler filename.
pub const ROUTE_FILE: &str = "route.rs";
/// Recognized layout filename.
pub const LAYOUT_FILE: &str = "layout.rs";

/// Name of the middleware function a layout source must export.
pub const LAYOUT_FN: &str = "layout";

/// Directory contents gathered before the subtree is grafted into the arena.
/// Pruned subtrees are dropped here and never reach the tree.
struct ScannedDir {
    path: PathBuf,
    name: String,
    handler_file: Option<PathBuf>,
    layout_file: Option<PathBuf>,
    methods: Vec<Method>,
    is_page: bool,
    is_api: bool,
    has_layout_fn: bool,
    children: Vec<ScannedDir>,
}

impl ScannedDir {
    fn keep(&self) -> bool {
        self.handler_file.is_some() || self.layout_file.is_some() || !self.children.is_empty()
    }
}

/// Scan an application root directory into a [`RouteTree`].
///
/// Only the `pages` and `api` branches are inspected; either may be absent.
/// A missing root directory is not an error and yields an empty tree.
///
/// # Errors
///
/// Directory-read failures and handler/layout parse failures are fatal and
/// carry the offending path.
pub fn scan_app(root: &Path) -> anyhow::Result<RouteTree> {
    let mut tree = RouteTree::new(root);
    if !root.is_dir() {
        return Ok(tree);
    }
    for branch in [PAGES_DIR, API_DIR] {
        let dir = root.join(branch);
        if !dir.is_dir() {
            continue;
        }
        if let Some(scanned) = scan_dir(&dir, branch)? {
            let root_id = tree.root();
            graft(&mut tree, root_id, scanned);
        }
    }
    Ok(tree)
}

/// Depth-first scan of one directory. Returns `None` when the whole subtree
/// is empty of handlers and layouts.
fn scan_dir(dir: &Path, name: &str) -> anyhow::Result<Option<ScannedDir>> {
    let mut scanned = ScannedDir {
        path: dir.to_path_buf(),
        name: name.to_string(),
        handler_file: None,
        layout_file: None,
        methods: Vec::new(),
        is_page: false,
        is_api: false,
        has_layout_fn: false,
        children: Vec::new(),
    };

    let mut subdirs: Vec<(String, PathBuf)> = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read directory {}", dir.display()))?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            subdirs.push((file_name, path));
            continue;
        }
        match file_name.as_str() {
            PAGE_FILE => scanned.is_page = true,
            ROUTE_FILE => scanned.is_api = true,
            LAYOUT_FILE => {
                scanned.has_layout_fn = exports_layout_fn(&path)?;
                scanned.layout_file = Some(path);
            }
            _ => {}
        }
    }

    // When a directory carries both handler flavors the scan stays
    // permissive; route.rs wins method detection and registration.
    if scanned.is_api {
        scanned.handler_file = Some(dir.join(ROUTE_FILE));
    } else if scanned.is_page {
        scanned.handler_file = Some(dir.join(PAGE_FILE));
    }
    if let Some(handler) = scanned.handler_file.clone() {
        scanned.methods = detect_methods(&handler)?;
    }

    // Sort by name so traversal, validation, and `list` output are stable
    // regardless of readdir order.
    subdirs.sort_by(|a, b| a.0.cmp(&b.0));
    for (sub_name, sub_path) in subdirs {
        if let Some(child) = scan_dir(&sub_path, &sub_name)? {
            scanned.children.push(child);
        }
    }

    if scanned.keep() {
        Ok(Some(scanned))
    } else {
        Ok(None)
    }
}

/// Convert a kept [`ScannedDir`] subtree into arena nodes under `parent`.
fn graft(tree: &mut RouteTree, parent: usize, scanned: ScannedDir) {
    let mut node = RouteNode::new(scanned.path, Segment::parse(&scanned.name));
    node.handler_file = scanned.handler_file;
    node.layout_file = scanned.layout_file;
    node.methods = scanned.methods;
    node.is_page = scanned.is_page;
    node.is_api = scanned.is_api;
    node.has_layout_fn = scanned.has_layout_fn;
    let id = tree.add_child(parent, node);
    for child in scanned.children {
        graft(tree, id, child);
    }
}

/// Parse a handler source and collect exported verb functions in declaration
/// order. Unexported functions and unrecognized names are ignored.
fn detect_methods(path: &Path) -> anyhow::Result<Vec<Method>> {
    let file = parse_source(path)?;
    let mut methods = Vec::new();
    for item in &file.items {
        if let syn::Item::Fn(func) = item {
            if !matches!(func.vis, syn::Visibility::Public(_)) {
                continue;
            }
            if let Some(method) = Method::from_ident(&func.sig.ident.to_string()) {
                if !methods.contains(&method) {
                    methods.push(method);
                }
            }
        }
    }
    Ok(methods)
}

/// Whether a layout source exports `pub fn layout`. Absence is recorded here
/// and reported by the validator, not the scanner.
fn exports_layout_fn(path: &Path) -> anyhow::Result<bool> {
    let file = parse_source(path)?;
    Ok(file.items.iter().any(|item| match item {
        syn::Item::Fn(func) => {
            matches!(func.vis, syn::Visibility::Public(_)) && func.sig.ident == LAYOUT_FN
        }
        _ => false,
    }))
}

/// Read and parse one handler or layout source. A parse failure is a hard
/// scan error reported with the offending file path.
fn parse_source(path: &Path) -> anyhow::Result<syn::File> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {}", path.display()))?;
    syn::parse_file(&source)
        .with_context(|| format!("failed to parse source file {}", path.display()))
}
