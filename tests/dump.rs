use predicates::prelude::*;

mod common;
use common::{cargo_bin, source_file};

#[test]
fn dump_emits_one_byte_for_fused_run() {
    let home = tempfile::tempdir().unwrap();
    let tf = source_file(">>>");
    cargo_bin(&home)
        .arg("-c")
        .arg(tf.path())
        .assert()
        .success()
        .stdout(vec![6u8]);
}

#[test]
fn dump_does_not_execute() {
    let home = tempfile::tempdir().unwrap();
    // Would overflow a two-cell tape if it ran.
    let tf = source_file("[-]+++.>>>>");
    cargo_bin(&home)
        .args(["--dump", "--capacity", "2"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout(vec![9u8, 0, 6]);
}

#[test]
fn unfused_dump_has_one_byte_per_instruction() {
    let home = tempfile::tempdir().unwrap();
    let tf = source_file(">>>");
    cargo_bin(&home)
        .args(["--dump", "--no-fuse"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout(vec![6u8, 6, 6]);
}

#[test]
fn listing_shows_mnemonics() {
    let home = tempfile::tempdir().unwrap();
    cargo_bin(&home)
        .arg("--listing")
        .write_stdin("+[->++<]>.")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ADD_VAL")
                .and(predicate::str::contains("MULTIPLY_MOVE"))
                .and(predicate::str::contains("OUTPUT")),
        );
}

#[test]
fn dump_and_listing_conflict() {
    let home = tempfile::tempdir().unwrap();
    cargo_bin(&home).args(["--dump", "--listing"]).write_stdin("+").assert().code(2);
}
