use askama::Template;

/// One `#[path]` module declaration in the generated file.
///
/// The alias doubles as the module name; it is the only way to address
/// handler sources living in directories like `[id]` whose names are not
/// valid Rust identifiers.
#[derive(Debug, Clone)]
pub struct ModuleImport {
    /// Path relative to the output file's module directory.
    pub path: String,
    /// Unique module alias.
    pub alias: String,
}

/// One registration call in the generated `register_routes` body.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Per-verb registration method on the router (`get`, `post`, ...).
    pub method_fn: &'static str,
    /// Derived URL pattern.
    pub pattern: String,
    /// Handler expression, e.g. `pages_users_page::GET`.
    pub handler: String,
    /// Comma-separated layout middleware expressions, outermost first.
    pub layers: String,
}

/// Template data for the generated routes file.
#[derive(Template)]
#[template(path = "routes.rs.txt", escape = "none")]
pub struct RoutesTemplateData {
    /// Package that owns the scanned app directory.
    pub package_name: String,
    /// Deduplicated module declarations, ordered by source path.
    pub modules: Vec<ModuleImport>,
    /// Registration calls, sorted by URL pattern.
    pub registrations: Vec<Registration>,
}
