use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn dirsplit_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dirsplit"))
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn source(&self, name: &str, files: usize) -> PathBuf {
        let dir = self.path(name);
        fs::create_dir_all(&dir).expect("create source");
        for i in 0..files {
            fs::write(dir.join(format!("file{:02}.txt", i)), format!("{}", i))
                .expect("write source file");
        }
        dir
    }

    fn target(&self) -> PathBuf {
        let dir = self.path("out");
        fs::create_dir_all(&dir).expect("create target");
        dir
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(dirsplit_bin())
            .args(args)
            .env("DIRSPLIT_HOME", self.path(".dirsplit"))
            .env_remove("DIRSPLIT_FILES_PER_DIR")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute dirsplit")
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_split_prints_one_line_per_file() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 5);
    let target = ws.target();

    let output = ws.run(&["-f", "2", "-t", arg(&target), "-s", arg(&photos)]);

    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(&output),
        String::from_utf8_lossy(&output.stderr)
    );
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        format!(
            "COPIED FILE: {}   TO: {}",
            photos.join("file00.txt").display(),
            target.join("photos_1").display()
        )
    );
    assert!(lines[4].ends_with("photos_3"));

    assert_eq!(entries(&target), vec!["photos_1", "photos_2", "photos_3"]);
    assert_eq!(entries(&target.join("photos_3")), vec!["file04.txt"]);
}

#[test]
fn test_zero_files_per_dir_aborts_before_copying() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 3);
    let target = ws.target();

    let output = ws.run(&["-f", "0", "-t", arg(&target), "-s", arg(&photos)]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("FilesPerDir=0 must be >= 1"));
    assert!(entries(&target).is_empty());
}

#[test]
fn test_target_listed_as_source_aborts() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 3);
    let target = ws.target();

    let output = ws.run(&["-t", arg(&target), "-s", arg(&photos), arg(&target)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("cannot be one of the source dirs"));
    assert!(entries(&target).is_empty());
}

#[test]
fn test_missing_source_aborts() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 3);
    let missing = ws.path("missing");
    let target = ws.target();

    let output = ws.run(&["-t", arg(&target), "-s", arg(&photos), arg(&missing)]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains(&format!("SourceDir={} does not exist", missing.display())));
    assert!(text.contains("TRY:"));
    assert!(entries(&target).is_empty());
}

#[test]
fn test_missing_target_aborts() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 1);
    let target = ws.path("nowhere");

    let output = ws.run(&["-t", arg(&target), "-s", arg(&photos)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("does not exist"));
    assert!(!target.exists());
}

#[test]
fn test_missing_required_arguments_is_usage_error() {
    let ws = Workspace::new();
    let output = ws.run(&["-f", "10"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_dry_run_plans_without_copying() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 3);
    let target = ws.target();

    let output = ws.run(&["--dry-run", "-f", "2", "-t", arg(&target), "-s", arg(&photos)]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().filter(|l| l.starts_with("PLANNED FILE:")).count(), 3);
    assert!(!text.contains("COPIED FILE:"));
    assert!(entries(&target).is_empty());
}

#[test]
fn test_json_summary() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 12);
    let target = ws.target();

    let output = ws.run(&["--json", "-f", "1", "-t", arg(&target), "-s", arg(&photos)]);

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON summary");
    assert_eq!(summary["total_files"], 12);
    assert_eq!(summary["dry_run"], false);
    assert_eq!(summary["sources"][0]["suffix_width"], 2);
    assert_eq!(summary["sources"][0]["subdirs"][0]["name"], "photos_01");
    assert_eq!(entries(&target).len(), 12);
}

#[test]
fn test_json_error() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 1);
    let target = ws.target();

    let output = ws.run(&["--json", "-f", "0", "-t", arg(&target), "-s", arg(&photos)]);

    assert_eq!(output.status.code(), Some(1));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON error");
    assert_eq!(payload["error"]["message"], "FilesPerDir=0 must be >= 1. Aborting");
}

#[test]
fn test_config_file_supplies_sources_and_target() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 4);
    let target = ws.target();
    let config = ws.path("stereo.toml");
    fs::write(
        &config,
        format!(
            "source_dirs = [{:?}]\ntarget_root = {:?}\nfiles_per_dir = 3\n",
            arg(&photos),
            arg(&target)
        ),
    )
    .expect("write config");

    let output = ws.run(&["--config", arg(&config)]);

    assert!(output.status.success(), "stdout:\n{}", stdout(&output));
    assert_eq!(entries(&target), vec!["photos_1", "photos_2"]);
    assert_eq!(entries(&target.join("photos_1")).len(), 3);
}

#[test]
fn test_run_writes_log_file() {
    let ws = Workspace::new();
    let photos = ws.source("photos", 1);
    let target = ws.target();

    let output = ws.run(&["-v", "-t", arg(&target), "-s", arg(&photos)]);

    assert!(output.status.success());
    let log = fs::read_to_string(ws.path(".dirsplit").join("logs").join("dirsplit.log"))
        .expect("read log file");
    assert!(log.contains("Processing: SourceDirName=photos"));
}
