use predicates::prelude::*;

mod common;
use common::{cargo_bin, source_file};

const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.";

#[test]
fn runs_program_from_file() {
    let home = tempfile::tempdir().unwrap();
    let tf = source_file(HELLO);
    cargo_bin(&home)
        .arg(tf.path())
        .assert()
        .success()
        .stdout("Hello")
        .stderr(predicate::str::is_empty());
}

#[test]
fn runs_program_from_stdin_when_no_file_given() {
    let home = tempfile::tempdir().unwrap();
    cargo_bin(&home)
        .write_stdin(HELLO)
        .assert()
        .success()
        .stdout("Hello");
}

#[test]
fn comments_are_ignored() {
    let home = tempfile::tempdir().unwrap();
    let tf = source_file("this program prints A\n+++++ +++++ [->++++++<] >+++++.\n");
    cargo_bin(&home).arg(tf.path()).assert().success().stdout("A");
}

#[test]
fn unfused_run_produces_same_output() {
    let home = tempfile::tempdir().unwrap();
    let tf = source_file(HELLO);
    cargo_bin(&home)
        .arg("--no-fuse")
        .arg(tf.path())
        .assert()
        .success()
        .stdout("Hello");
}

#[test]
fn unmatched_brackets_do_not_fail() {
    let home = tempfile::tempdir().unwrap();
    let tf = source_file("]+++[-]++++++++[>++++++++<-]>+.[");
    cargo_bin(&home).arg(tf.path()).assert().success().stdout("A");
}

#[test]
fn help_flag_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    cargo_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:").and(predicate::str::contains("--dump")));
}
