//! Manifest tests: rendering, refuse-if-present, interrupts, settings file and flags.

use clap::Parser;
use dirsum::engine::{Cli, digest_to_hex, hash_bytes, setup_opts};
use dirsum::manifest::{
    ManifestOutcome, create_manifest, format_line, manifest_exists, manifest_path,
    render_manifest,
};
use dirsum::utils::{
    MANIFEST_BANNER, apply_file_to_opts, parse_dirsum_toml, rename_temp_to_final, temp_path_for,
    write_temp,
};
use dirsum::{DigestError, DigestMap, Opts};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn write(root: &Path, rel: &str, content: &[u8]) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, content).unwrap();
}

fn no_progress() -> Option<fn(usize)> {
    None
}

// --- rendering ---

#[test]
fn test_render_sorts_bytewise_and_skips_hidden() {
    let mut map = DigestMap::new();
    for k in ["sub/b.txt", "a.txt", ".md5list.tmp", "a/z", ".hidden", "sub/.env"] {
        map.insert(k.to_string(), hash_bytes(k.as_bytes()));
    }
    let (text, entries) = render_manifest(&map);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], MANIFEST_BANNER);
    let keys: Vec<&str> = lines[1..]
        .iter()
        .map(|l| l.split_once("  ").unwrap().1)
        .collect();
    // '.' (0x2e) sorts before '/' (0x2f): "a.txt" < "a/z".
    assert_eq!(keys, vec!["a.txt", "a/z", "sub/.env", "sub/b.txt"]);
    assert_eq!(entries, 4);
}

#[test]
fn test_format_line() {
    let d = hash_bytes(b"hello");
    let line = format_line("a.txt", &d);
    assert_eq!(line, format!("{}  a.txt\n", digest_to_hex(&d)));
}

#[test]
fn test_manifest_exists_ignores_directories() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join(".md5list");
    assert!(!manifest_exists(&p));
    fs::create_dir(&p).unwrap();
    assert!(!manifest_exists(&p));
}

#[test]
fn test_manifest_path_default_and_override() {
    let root = Path::new("/data");
    assert_eq!(manifest_path(root, None), PathBuf::from("/data/.md5list"));
    assert_eq!(manifest_path(root, Some("SUMS")), PathBuf::from("/data/SUMS"));
}

// --- temp files ---

#[test]
fn test_temp_path_is_sibling() {
    let p = temp_path_for(Path::new("/data/photos/.md5list"));
    assert_eq!(p, PathBuf::from("/data/photos/.md5list.tmp"));
}

#[test]
fn test_write_then_rename() {
    let dir = tempfile::tempdir().unwrap();
    let final_path = dir.path().join("SUMS");
    let temp = temp_path_for(&final_path);
    fs::write(&temp, "stale").unwrap();
    write_temp(&temp, "fresh\n").unwrap();
    rename_temp_to_final(&temp, &final_path).unwrap();
    assert!(!temp.exists());
    assert_eq!(fs::read_to_string(&final_path).unwrap(), "fresh\n");
}

// --- create_manifest ---

#[test]
fn test_writes_sorted_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sub/b.txt", b"world");
    write(dir.path(), "a.txt", b"hello");
    write(dir.path(), ".secret", b"top-level hidden");
    write(dir.path(), "sub/.env", b"nested hidden");

    let outcome = create_manifest(dir.path(), &Opts::default(), no_progress()).unwrap();
    let (path, entries, contents) = match outcome {
        ManifestOutcome::Written {
            path,
            entries,
            contents,
        } => (path, entries, contents),
        other => panic!("expected a written manifest, got {other:?}"),
    };
    assert_eq!(path, dir.path().join(".md5list"));
    assert_eq!(entries, 3);

    let expected = format!(
        "{MANIFEST_BANNER}\n{}  a.txt\n{}  sub/.env\n{}  sub/b.txt\n",
        digest_to_hex(&hash_bytes(b"hello")),
        digest_to_hex(&hash_bytes(b"nested hidden")),
        digest_to_hex(&hash_bytes(b"world")),
    );
    assert_eq!(contents, expected);
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    assert!(!dir.path().join(".md5list.tmp").exists());
}

#[test]
fn test_existing_manifest_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"hello");
    let manifest = manifest_path(dir.path(), None);
    fs::write(&manifest, "previous run\n").unwrap();

    let mut calls = 0;
    let outcome = create_manifest(dir.path(), &Opts::default(), Some(|n| calls += n)).unwrap();
    assert!(matches!(outcome, ManifestOutcome::AlreadyProcessed(ref p) if *p == manifest));
    assert_eq!(calls, 0, "nothing should be hashed");
    assert_eq!(fs::read_to_string(&manifest).unwrap(), "previous run\n");
}

#[test]
fn test_second_run_reports_already_processed() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "x", b"x");
    let first = create_manifest(dir.path(), &Opts::default(), no_progress()).unwrap();
    assert!(matches!(first, ManifestOutcome::Written { .. }));
    let written = fs::read_to_string(manifest_path(dir.path(), None)).unwrap();

    let second = create_manifest(dir.path(), &Opts::default(), no_progress()).unwrap();
    assert!(matches!(second, ManifestOutcome::AlreadyProcessed(_)));
    assert_eq!(
        fs::read_to_string(manifest_path(dir.path(), None)).unwrap(),
        written
    );
}

#[test]
fn test_error_leaves_no_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    let err = create_manifest(&missing, &Opts::default(), no_progress()).unwrap_err();
    assert!(err.to_string().contains("gone"));
    assert!(!manifest_path(&missing, None).exists());
}

#[test]
fn test_interrupt_during_hashing_leaves_no_manifest() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..20 {
        write(dir.path(), &format!("d{}/f{i}", i % 3), b"payload");
    }
    let flag = Arc::new(AtomicBool::new(false));
    let opts = Opts {
        num_threads: Some(1),
        interrupt: Some(Arc::clone(&flag)),
        ..Default::default()
    };
    // Ctrl+C lands after the first digest, once the walk has already queued every path.
    let on_progress = |_: usize| flag.store(true, Ordering::Relaxed);
    let err = create_manifest(dir.path(), &opts, Some(on_progress)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DigestError>(),
        Some(DigestError::Interrupted)
    ));
    assert!(!dir.path().join(".md5list").exists());
    assert!(!dir.path().join(".md5list.tmp").exists());
}

#[test]
fn test_interrupt_before_run_leaves_no_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"hello");
    let opts = Opts {
        interrupt: Some(Arc::new(AtomicBool::new(true))),
        ..Default::default()
    };
    let err = create_manifest(dir.path(), &opts, no_progress()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DigestError>(),
        Some(DigestError::Interrupted)
    ));
    assert!(!manifest_path(dir.path(), None).exists());
}

#[test]
fn test_custom_manifest_name() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"hello");
    let opts = Opts {
        manifest_name: Some("SUMS".to_string()),
        ..Default::default()
    };
    create_manifest(dir.path(), &opts, no_progress()).unwrap();
    let text = fs::read_to_string(dir.path().join("SUMS")).unwrap();
    assert!(text.starts_with(MANIFEST_BANNER));
    assert!(text.ends_with("  a.txt\n"));
    assert!(!dir.path().join(".md5list").exists());
}

#[test]
fn test_settings_file_then_cli_flags() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        ".dirsum.toml",
        b"[settings]\nmanifest = \"FROM_FILE\"\nthreads = 2\nquiet = true\n",
    );
    let dir_arg = dir.path().to_str().unwrap();

    let opts = setup_opts(&Cli::parse_from(["dirsum", dir_arg]));
    assert_eq!(opts.manifest_name.as_deref(), Some("FROM_FILE"));
    assert_eq!(opts.num_threads, Some(2));
    assert!(opts.quiet);

    let opts = setup_opts(&Cli::parse_from([
        "dirsum", dir_arg, "-o", "FROM_CLI", "-j", "5", "--quiet", "false",
    ]));
    assert_eq!(opts.manifest_name.as_deref(), Some("FROM_CLI"));
    assert_eq!(opts.num_threads, Some(5));
    assert!(!opts.quiet);
}

#[test]
fn test_settings_apply_only_present_fields() {
    let file = parse_dirsum_toml(
        r#"
        [settings]
        manifest = "SUMS"
        threads = 3
        parallel_walk = true
        "#,
    )
    .unwrap();
    let mut opts = Opts {
        quiet: true,
        ..Default::default()
    };
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.manifest_name.as_deref(), Some("SUMS"));
    assert_eq!(opts.num_threads, Some(3));
    assert!(opts.use_parallel_walk);
    assert!(opts.quiet);
    assert!(!opts.follow_links);
}

#[test]
fn test_empty_settings_file_is_default() {
    let file = parse_dirsum_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert!(opts.manifest_name.is_none());
    assert!(opts.num_threads.is_none());
}

#[test]
fn test_settings_wrong_type_is_error() {
    assert!(parse_dirsum_toml("[settings]\nthreads = \"many\"\n").is_err());
}

// --- command line ---

#[test]
fn test_cli_defaults() {
    let cli = Cli::parse_from(["dirsum"]);
    assert_eq!(cli.dir, PathBuf::from("."));
    assert!(cli.manifest.is_none());
    assert!(cli.verbose.is_none());
}

#[test]
fn test_cli_flags() {
    let cli = Cli::parse_from(["dirsum", "/data", "-j", "4", "-p", "-q", "-o", "SUMS"]);
    assert_eq!(cli.dir, PathBuf::from("/data"));
    assert_eq!(cli.threads, Some(4));
    assert_eq!(cli.parallel_walk, Some(true));
    assert_eq!(cli.quiet, Some(true));
    assert_eq!(cli.manifest.as_deref(), Some("SUMS"));
}
