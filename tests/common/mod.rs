#![allow(dead_code)]

use std::io::Write;

/// `bf` with a private, empty config home so a user's `bf.toml` and
/// environment cannot leak into assertions.
pub fn cargo_bin(config_home: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("bf").expect("bf binary");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("BF_EOF")
        .env_remove("BF_TAPE_CAPACITY")
        .env_remove("BF_MAX_STEPS")
        .env_remove("RUST_LOG");
    cmd
}

pub fn source_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}
