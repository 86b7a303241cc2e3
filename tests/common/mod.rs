use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn include_cmd() -> Command {
    let mut cmd = Command::cargo_bin("include-ext").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write `content` to `root/name`, creating parent directories.
#[allow(dead_code)]
pub fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
