use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Sibling temp path for a manifest: `<name>.tmp` in the same directory.
pub fn temp_path_for(manifest_path: &Path) -> PathBuf {
    let name = manifest_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| PackagePaths::get().manifest_filename());
    manifest_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Write `contents` to `temp_path` and fsync it. Removes a stale temp first.
pub fn write_temp(temp_path: &Path, contents: &str) -> Result<()> {
    if temp_path.exists() {
        fs::remove_file(temp_path)
            .with_context(|| format!("remove stale temp manifest at {}", temp_path.display()))?;
    }
    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("create temp manifest {}", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("write temp manifest {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync temp manifest {}", temp_path.display()))?;
    Ok(())
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp manifest to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })
}
