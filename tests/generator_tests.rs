use loam_routegen::generator::{collect_routes, generate_routes, render_routes};
use loam_routegen::manifest::resolve_manifest;
use loam_routegen::scan::scan_app;
use loam_routegen::validator::ensure_valid;
use std::fs;
use std::path::{Path, PathBuf};

mod common;
use common::fixtures::{handler_source, init_project, layout_source, write_source};

/// Scan, validate, and render for a scaffolded project. Output location is
/// the default `src/routes.rs` next to the app directory.
fn render(root: &Path) -> (String, PathBuf) {
    let app = root.join("src/app");
    let output = root.join("src/routes.rs");
    let manifest = resolve_manifest(&app).unwrap();
    let tree = scan_app(&app).unwrap();
    ensure_valid(&tree).unwrap();
    let rendered = render_routes(&tree, &manifest, &output).unwrap();
    (rendered, output)
}

#[test]
fn test_users_scenario_registers_all_methods() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/users/page.rs", &handler_source(&["GET", "POST"]));
    write_source(
        &app,
        "pages/users/[id]/page.rs",
        &handler_source(&["GET", "PUT", "DELETE"]),
    );
    let (out, _) = render(dir.path());

    assert!(out.contains("router.get(\"/users\", "));
    assert!(out.contains("router.post(\"/users\", "));
    assert!(out.contains("router.get(\"/users/{id}\", "));
    assert!(out.contains("router.put(\"/users/{id}\", "));
    assert!(out.contains("router.delete(\"/users/{id}\", "));
    // Route order is lexicographic by pattern.
    assert!(out.find("\"/users\"").unwrap() < out.find("\"/users/{id}\"").unwrap());
}

#[test]
fn test_module_paths_resolve_relative_to_output() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/users/page.rs", &handler_source(&["GET"]));
    let (out, _) = render(dir.path());
    // src/routes.rs resolves nested modules against src/routes/.
    assert!(out.contains("#[path = \"../app/pages/users/page.rs\"]"));
    assert!(out.contains("mod pages_users_page;"));
    assert!(out.contains("pages_users_page::GET"));
}

#[test]
fn test_api_branch_retained_and_pages_elided() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/users/page.rs", &handler_source(&["GET"]));
    write_source(&app, "api/users/route.rs", &handler_source(&["GET"]));
    let (out, _) = render(dir.path());
    assert!(out.contains("router.get(\"/users\", "));
    assert!(out.contains("router.get(\"/api/users\", "));
    assert!(out.contains("api_users_route::GET"));
}

#[test]
fn test_catch_all_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/docs/[...slug]/page.rs", &handler_source(&["GET"]));
    let (out, _) = render(dir.path());
    assert!(out.contains("router.get(\"/docs/{slug...}\", "));
}

#[test]
fn test_layout_chain_wraps_handler() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/layout.rs", &layout_source());
    write_source(&app, "pages/admin/layout.rs", &layout_source());
    write_source(&app, "pages/admin/page.rs", &handler_source(&["GET"]));
    let (out, _) = render(dir.path());
    // Outermost layout first inside the compose call.
    assert!(out.contains(
        "compose(Box::new(pages_admin_page::GET), vec![pages_layout::layout, pages_admin_layout::layout])"
    ));
    // Each layout is declared once.
    assert_eq!(out.matches("mod pages_layout;").count(), 1);
}

#[test]
fn test_generated_output_is_valid_rust() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/layout.rs", &layout_source());
    write_source(&app, "pages/users/page.rs", &handler_source(&["GET", "POST"]));
    write_source(&app, "api/users/[id]/route.rs", &handler_source(&["DELETE"]));
    let (out, _) = render(dir.path());
    syn::parse_file(&out).expect("generated output must parse as Rust");
}

#[test]
fn test_empty_tree_generates_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path(), "demo-app");
    let (out, _) = render(dir.path());
    syn::parse_file(&out).expect("empty output must parse as Rust");
    assert!(out.contains("pub fn register_routes"));
    assert!(!out.contains("router.get"));
}

#[test]
fn test_header_marks_file_generated() {
    let dir = tempfile::tempdir().unwrap();
    init_project(dir.path(), "demo-app");
    let (out, _) = render(dir.path());
    assert!(out.starts_with("//! Route registrations for `demo-app`."));
    assert!(out.contains("DO NOT EDIT"));
}

#[test]
fn test_generation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/users/page.rs", &handler_source(&["GET"]));
    write_source(&app, "pages/users/[id]/page.rs", &handler_source(&["GET"]));

    let output = dir.path().join("src/routes.rs");
    let manifest = resolve_manifest(&app).unwrap();
    let tree = scan_app(&app).unwrap();
    generate_routes(&tree, &manifest, &output).unwrap();
    let first = fs::read_to_string(&output).unwrap();

    let tree = scan_app(&app).unwrap();
    generate_routes(&tree, &manifest, &output).unwrap();
    let second = fs::read_to_string(&output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generate_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/page.rs", &handler_source(&["GET"]));
    let output = dir.path().join("src/routes.rs");
    fs::write(&output, "stale contents").unwrap();

    let manifest = resolve_manifest(&app).unwrap();
    let tree = scan_app(&app).unwrap();
    generate_routes(&tree, &manifest, &output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(!written.contains("stale contents"));
    assert!(written.contains("router.get(\"/\", "));
    // The temp file used for the atomic write is gone.
    assert!(!dir.path().join("src/routes.rs.tmp").exists());
}

#[test]
fn test_collect_routes_sorted_with_layouts() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_project(dir.path(), "demo-app");
    write_source(&app, "pages/layout.rs", &layout_source());
    write_source(&app, "pages/b/page.rs", &handler_source(&["GET"]));
    write_source(&app, "pages/a/page.rs", &handler_source(&["GET"]));
    write_source(&app, "api/a/route.rs", &handler_source(&["GET"]));
    let tree = scan_app(&app).unwrap();
    let routes = collect_routes(&tree);
    let patterns: Vec<&str> = routes.iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["/a", "/api/a", "/b"]);
    assert_eq!(routes[0].layouts.len(), 1); // pages layout applies to /a
    assert!(routes[1].layouts.is_empty()); // api branch has no layout
}
