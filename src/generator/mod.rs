//! # Generator Module
//!
//! The generator consumes a validated route tree and synthesizes one
//! self-contained, compilable Rust source file that registers every route
//! against a `loam::Router`.
//!
//! ## Architecture
//!
//! Generation is structured template assembly, not string concatenation:
//!
//! ```text
//! Route Tree → Route Collection → Import Dedup → Askama Rendering → Atomic Write
//! ```
//!
//! 1. **Route Collection** - every handler-bearing node, sorted by derived
//!    URL pattern so output is stable across re-runs
//! 2. **Import Dedup** - one `#[path]` module declaration per source file,
//!    aliases disambiguated deterministically
//! 3. **Rendering** - `templates/routes.rs.txt` assembles header, module
//!    block, the `compose` middleware helper, and `register_routes`
//! 4. **Atomic Write** - rendered output lands via temp file + rename, so a
//!    failed run never leaves a partial file
//!
//! ## Generated Shape
//!
//! ```text
//! //! Route registrations for `my-app`.       header, DO NOT EDIT marker
//! #[path = "../app/pages/users/page.rs"]
//! mod pages_users_page;                       deduplicated module aliases
//! fn compose(...) -> Handler { ... }          middleware composition helper
//! pub fn register_routes(router: &mut Router) // one call per route × method
//! ```
//!
//! Module aliases are the only way Rust can address sources in directories
//! like `[id]` whose names are not valid module identifiers; `#[path]`
//! declarations are resolved relative to the output file's module directory.

mod templates;

pub use templates::{ModuleImport, Registration, RoutesTemplateData};

use crate::layout::{layout_chain, node_alias};
use crate::manifest::ProjectManifest;
use crate::tree::{NodeId, RouteTree};
use anyhow::Context;
use askama::Template;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// One discovered route, as reported by `loam-gen list` and exercised by
/// tests. Sorted output of [`collect_routes`].
#[derive(Debug, Clone)]
pub struct RouteSummary {
    pub pattern: String,
    pub node: NodeId,
    pub handler_file: PathBuf,
    pub methods: Vec<crate::tree::Method>,
    pub layouts: Vec<PathBuf>,
}

/// Collect every handler-bearing node with its derived pattern and active
/// layout chain, sorted lexicographically by pattern.
pub fn collect_routes(tree: &RouteTree) -> Vec<RouteSummary> {
    let mut routes: Vec<RouteSummary> = tree
        .handler_nodes()
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            RouteSummary {
                pattern: tree.url_pattern(id),
                node: id,
                handler_file: node.handler_file.clone().unwrap_or_default(),
                methods: node.methods.clone(),
                layouts: layout_chain(tree, id)
                    .into_iter()
                    .map(|entry| entry.source)
                    .collect(),
            }
        })
        .collect();
    routes.sort_by(|a, b| {
        a.pattern
            .cmp(&b.pattern)
            .then_with(|| a.handler_file.cmp(&b.handler_file))
    });
    routes
}

/// Deduplicates imported source files and keeps their aliases unique.
struct AliasTable {
    by_source: BTreeMap<PathBuf, String>,
    used: BTreeSet<String>,
}

impl AliasTable {
    fn new() -> Self {
        AliasTable {
            by_source: BTreeMap::new(),
            used: BTreeSet::new(),
        }
    }

    /// Return the alias for `source`, assigning `candidate` (with a numeric
    /// suffix on collision) the first time the file is seen.
    fn assign(&mut self, source: &Path, candidate: &str) -> String {
        if let Some(existing) = self.by_source.get(source) {
            return existing.clone();
        }
        let mut alias = candidate.to_string();
        let mut n = 2;
        while self.used.contains(&alias) {
            alias = format!("{candidate}_{n}");
            n += 1;
        }
        self.used.insert(alias.clone());
        self.by_source.insert(source.to_path_buf(), alias.clone());
        alias
    }
}

/// Render the generated routes file for a validated tree.
///
/// `output` determines how `#[path]` module declarations are resolved, so the
/// rendered text depends on where it will be written.
///
/// # Errors
///
/// Fails when a module path cannot be computed relative to the output
/// location or when template rendering fails.
pub fn render_routes(
    tree: &RouteTree,
    manifest: &ProjectManifest,
    output: &Path,
) -> anyhow::Result<String> {
    let base_dir = module_base_dir(output)?;
    let mut aliases = AliasTable::new();
    let mut registrations = Vec::new();

    for route in collect_routes(tree) {
        let node = tree.node(route.node);
        let stem = route
            .handler_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        let handler_alias = aliases.assign(
            &route.handler_file,
            &node_alias(tree, route.node, &stem),
        );

        let layers = layout_chain(tree, route.node)
            .iter()
            .map(|entry| {
                let alias = aliases.assign(&entry.source, &entry.alias);
                format!("{alias}::{}", entry.func)
            })
            .collect::<Vec<_>>()
            .join(", ");

        for method in &node.methods {
            registrations.push(Registration {
                method_fn: method.router_fn(),
                pattern: route.pattern.clone(),
                handler: format!("{handler_alias}::{}", method.verb()),
                layers: layers.clone(),
            });
        }
    }

    let mut modules = Vec::new();
    for (source, alias) in &aliases.by_source {
        modules.push(ModuleImport {
            path: relative_path(&base_dir, source)?,
            alias: alias.clone(),
        });
    }

    RoutesTemplateData {
        package_name: manifest.package_name.clone(),
        modules,
        registrations,
    }
    .render()
    .context("failed to render routes template")
}

/// Render and write the routes file.
///
/// The file is written in full or not at all: rendering happens first, then
/// the result lands through a temp file renamed over the target.
pub fn generate_routes(
    tree: &RouteTree,
    manifest: &ProjectManifest,
    output: &Path,
) -> anyhow::Result<()> {
    let rendered = render_routes(tree, manifest, output)?;
    write_atomic(output, &rendered)?;
    println!("✅ Generated routes → {}", output.display());
    Ok(())
}

fn write_atomic(output: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    let tmp = output.with_extension("rs.tmp");
    fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, output)
        .with_context(|| format!("failed to move generated file into {}", output.display()))?;
    Ok(())
}

/// Directory against which `#[path]` declarations inside `output` resolve.
///
/// For mod-rs style files (`mod.rs`, `lib.rs`, `main.rs`) that is the file's
/// own directory; for any other file it is the directory named after the
/// file's stem.
fn module_base_dir(output: &Path) -> anyhow::Result<PathBuf> {
    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("output path {} has no file name", output.display()))?;
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if matches!(file_name.as_str(), "mod.rs" | "lib.rs" | "main.rs") {
        Ok(parent)
    } else {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file_name);
        Ok(parent.join(stem))
    }
}

/// Lexical relative path from `from_dir` to `to`, with forward slashes as
/// required inside `#[path]` strings.
fn relative_path(from_dir: &Path, to: &Path) -> anyhow::Result<String> {
    let from = normalize(&std::path::absolute(from_dir).with_context(|| {
        format!("failed to resolve output directory {}", from_dir.display())
    })?);
    let to = normalize(&std::path::absolute(to).with_context(|| {
        format!("failed to resolve module path {}", to.display())
    })?);

    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..".to_string());
    }
    for component in &to_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    if parts.is_empty() {
        anyhow::bail!(
            "module path {} resolves to the output directory itself",
            to.display()
        );
    }
    Ok(parts.join("/"))
}

/// Resolve `.` and `..` components lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_base_dir() {
        assert_eq!(
            module_base_dir(Path::new("src/routes.rs")).unwrap(),
            PathBuf::from("src/routes")
        );
        assert_eq!(
            module_base_dir(Path::new("src/routes/mod.rs")).unwrap(),
            PathBuf::from("src/routes")
        );
        assert_eq!(
            module_base_dir(Path::new("routes.rs")).unwrap(),
            PathBuf::from("./routes")
        );
    }

    #[test]
    fn test_relative_path() {
        let rel = relative_path(Path::new("/p/src/routes"), Path::new("/p/src/app/pages/page.rs"))
            .unwrap();
        assert_eq!(rel, "../app/pages/page.rs");
        let rel = relative_path(Path::new("/p/src"), Path::new("/p/src/app/api/route.rs")).unwrap();
        assert_eq!(rel, "app/api/route.rs");
    }

    #[test]
    fn test_alias_table_disambiguates() {
        let mut table = AliasTable::new();
        let a = table.assign(Path::new("a/users/page.rs"), "users_page");
        let b = table.assign(Path::new("b/users/page.rs"), "users_page");
        let a_again = table.assign(Path::new("a/users/page.rs"), "users_page");
        assert_eq!(a, "users_page");
        assert_eq!(b, "users_page_2");
        assert_eq!(a_again, "users_page");
    }
}
