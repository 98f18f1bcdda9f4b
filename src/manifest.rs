//! Project manifest resolution.
//!
//! The generator needs to know which crate owns the scanned app directory:
//! the package name appears in the generated file header, and the manifest
//! location anchors the project root. Resolution happens before any scanning
//! and a missing or unparseable `Cargo.toml` is fatal.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
}

/// The resolved enclosing project.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    /// `[package].name` from the manifest.
    pub package_name: String,
    /// Path of the `Cargo.toml` that was found.
    pub manifest_path: PathBuf,
}

/// Locate and parse the project manifest by walking up from `start`.
///
/// The first `Cargo.toml` found must carry a `[package]` table with a name;
/// a bare workspace manifest at that position is an error, since the app
/// directory must belong to a package.
///
/// # Errors
///
/// Fails when no manifest exists on the ancestor chain, when the manifest is
/// not valid TOML, or when it lacks a package name.
pub fn resolve_manifest(start: &Path) -> anyhow::Result<ProjectManifest> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = if current.as_os_str().is_empty() {
            PathBuf::from("Cargo.toml")
        } else {
            current.join("Cargo.toml")
        };
        if candidate.is_file() {
            let raw = fs::read_to_string(&candidate)
                .with_context(|| format!("failed to read manifest {}", candidate.display()))?;
            let manifest: CargoManifest = toml::from_str(&raw)
                .with_context(|| format!("failed to parse manifest {}", candidate.display()))?;
            let package = manifest.package.with_context(|| {
                format!(
                    "manifest {} has no [package] table; the app directory must live inside a package",
                    candidate.display()
                )
            })?;
            return Ok(ProjectManifest {
                package_name: package.name,
                manifest_path: candidate,
            });
        }
        dir = current.parent();
    }
    anyhow::bail!(
        "no Cargo.toml found on the ancestor chain of {}",
        start.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_nearest_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"demo-app\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        let app = dir.path().join("src/app");
        fs::create_dir_all(&app).unwrap();
        let manifest = resolve_manifest(&app).unwrap();
        assert_eq!(manifest.package_name, "demo-app");
        assert_eq!(manifest.manifest_path, dir.path().join("Cargo.toml"));
    }

    #[test]
    fn test_workspace_only_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"demo\"]\n",
        )
        .unwrap();
        let err = resolve_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("[package]"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "not = [toml").unwrap();
        let err = resolve_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
