//! Workspace adapter over a real throwaway git repository. Skips cleanly on
//! machines without the external tools.

use std::path::Path;
use std::process::{Command, Stdio};

use flagrefs::RepoWorkspace;

fn tool_available(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("spawn git");
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "test"]);
    git(dir, &["checkout", "-b", "main"]);
    std::fs::write(dir.join("file.txt"), "contents\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "initial"]);
}

#[test]
fn resolves_branch_and_head_sha() {
    if !tool_available("git") || !tool_available("ag") {
        eprintln!("skipping: git/ag not available");
        return;
    }
    let td = tempfile::tempdir().unwrap();
    init_repo(td.path());

    let ws = RepoWorkspace::open(td.path()).expect("open workspace");
    assert_eq!(ws.branch, "main");
    assert_eq!(ws.head_sha.len(), 40);
    assert!(ws.head_sha.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(ws.root.is_absolute());
}

#[test]
fn detached_head_is_a_configuration_error() {
    if !tool_available("git") || !tool_available("ag") {
        eprintln!("skipping: git/ag not available");
        return;
    }
    let td = tempfile::tempdir().unwrap();
    init_repo(td.path());
    git(td.path(), &["checkout", "--detach"]);

    let err = RepoWorkspace::open(td.path()).unwrap_err();
    assert!(err.to_string().contains("valid branch"), "{}", err);
}
