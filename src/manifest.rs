//! Manifest rendering and persistence

use anyhow::{Context, Result};
use log::debug;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::engine::hashing::digest_to_hex;
use crate::engine::tools::is_hidden_key;
use crate::pipeline::compute_digests;
use crate::utils::config::{MANIFEST_BANNER, PackagePaths};
use crate::utils::tempfiles::{rename_temp_to_final, temp_path_for, write_temp};
use crate::{Digest, DigestMap, DigestOpts, Opts};

/// Result of [`create_manifest`].
#[derive(Debug)]
pub enum ManifestOutcome {
    /// A manifest already existed; nothing was hashed or written.
    AlreadyProcessed(PathBuf),
    Written {
        path: PathBuf,
        /// Number of entry lines (hidden keys excluded).
        entries: usize,
        /// Full manifest text, banner included.
        contents: String,
    },
}

/// `<root>/<name>`, with the default name when `name` is None.
pub fn manifest_path(root: &Path, name: Option<&str>) -> PathBuf {
    root.join(name.unwrap_or_else(|| PackagePaths::get().manifest_filename()))
}

/// True when `path` exists and is not a directory.
pub fn manifest_exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| !m.is_dir())
}

/// One manifest line: `<hex-digest>  <path>\n`.
pub fn format_line(path: &str, digest: &Digest) -> String {
    format!("{}  {}\n", digest_to_hex(digest), path)
}

/// Banner, then one line per non-hidden key in byte-wise sorted order.
pub fn render_manifest(digests: &DigestMap) -> (String, usize) {
    let mut paths: Vec<&String> = digests.keys().filter(|k| !is_hidden_key(k)).collect();
    paths.sort();
    let mut out = String::with_capacity(MANIFEST_BANNER.len() + 1 + paths.len() * 80);
    let _ = writeln!(out, "{MANIFEST_BANNER}");
    for path in &paths {
        out.push_str(&format_line(path, &digests[*path]));
    }
    (out, paths.len())
}

/// Write the manifest via a sibling temp file and rename, so a failed write never leaves a
/// truncated manifest in place.
pub fn write_manifest(path: &Path, contents: &str) -> Result<()> {
    let temp = temp_path_for(path);
    write_temp(&temp, contents)?;
    if let Err(e) = rename_temp_to_final(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }
    Ok(())
}

/// Hash `root` and write its manifest, unless the manifest already exists.
pub fn create_manifest<F>(root: &Path, opts: &Opts, on_progress: Option<F>) -> Result<ManifestOutcome>
where
    F: FnMut(usize),
{
    let path = manifest_path(root, opts.manifest_name.as_deref());
    if manifest_exists(&path) {
        return Ok(ManifestOutcome::AlreadyProcessed(path));
    }

    let digests = compute_digests(root, &DigestOpts::from(opts), on_progress)
        .with_context(|| format!("hash {}", root.display()))?;
    let (contents, entries) = render_manifest(&digests);
    debug!(
        "{} digests, {} manifest entries ({} hidden)",
        digests.len(),
        entries,
        digests.len() - entries
    );
    write_manifest(&path, &contents)?;
    Ok(ManifestOutcome::Written {
        path,
        entries,
        contents,
    })
}
