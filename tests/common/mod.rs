#![allow(dead_code)]

pub mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Write a source file under `root`, creating parent directories.
    pub fn write_source(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// A handler source exporting the given verb functions, in order.
    pub fn handler_source(verbs: &[&str]) -> String {
        let mut src = String::from("#![allow(non_snake_case)]\n\n");
        for verb in verbs {
            src.push_str(&format!(
                "pub fn {verb}(_req: &mut loam::Request) -> loam::Response {{\n    loam::Response::ok()\n}}\n\n"
            ));
        }
        src
    }

    /// A layout source exporting the conventional middleware function.
    pub fn layout_source() -> String {
        "pub fn layout(next: loam::Handler) -> loam::Handler {\n    next\n}\n".to_string()
    }

    /// Scaffold a minimal project: a `Cargo.toml` for `name` plus an empty
    /// `src/app` directory. Returns the app directory path.
    pub fn init_project(root: &Path, name: &str) -> PathBuf {
        fs::write(
            root.join("Cargo.toml"),
            format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n"),
        )
        .unwrap();
        let app = root.join("src").join("app");
        fs::create_dir_all(&app).unwrap();
        app
    }
}
