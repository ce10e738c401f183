//! Locating bundled resources (weights, icon, settings).
//!
//! Two layouts are supported:
//! * development – files under `<crate>/assets`
//! * packaged – files next to the executable, inside a macOS bundle's
//!   `Resources`, or in a directory the launcher unpacks at start-up and
//!   exports as `HTS_PREDICTOR_RESOURCES`.

use std::path::{Path, PathBuf};

/// Environment variable naming an unpacked resource directory.
pub const RESOURCE_DIR_ENV: &str = "HTS_PREDICTOR_RESOURCES";

/// Candidate resource directories, most specific first.
pub fn resource_bases() -> Vec<PathBuf> {
    let mut bases = Vec::new();

    if let Some(dir) = std::env::var_os(RESOURCE_DIR_ENV) {
        bases.push(PathBuf::from(dir));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        bases.push(exe_dir.clone());
        bases.push(exe_dir.join("..").join("Resources"));
    }

    bases.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
    bases
}

/// Resolve `relative` against the first base that contains it.
///
/// Falls back to the first base so that error messages name a concrete
/// location even when the file exists nowhere.
pub fn resolve_in(bases: &[PathBuf], relative: impl AsRef<Path>) -> PathBuf {
    let relative = relative.as_ref();
    if relative.is_absolute() {
        return relative.to_path_buf();
    }

    bases
        .iter()
        .map(|base| base.join(relative))
        .find(|candidate| candidate.exists())
        .or_else(|| bases.first().map(|base| base.join(relative)))
        .unwrap_or_else(|| relative.to_path_buf())
}

/// Resolve `relative` against [`resource_bases`].
pub fn resource_path(relative: impl AsRef<Path>) -> PathBuf {
    let path = resolve_in(&resource_bases(), relative);
    log::debug!("Resolved resource {}", path.display());
    path
}
