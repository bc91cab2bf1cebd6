use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;

fn lindup() -> Command {
    let mut cmd = Command::cargo_bin("lindup").unwrap();
    cmd.arg("--color=never");
    cmd
}

fn path_with(temp: &TempDir, name: &str, contents: &str) -> String {
    let f = temp.child(name);
    f.write_str(contents).unwrap();
    f.path().to_str().unwrap().to_string()
}

#[test]
fn requires_two_files() {
    lindup().assert().code(1);
    let temp = TempDir::new().unwrap();
    let only = path_with(&temp, "only.txt", "a\n");
    lindup().arg(&only).assert().code(1);
    temp.child("only.txt").assert("a\n");
}

#[test]
fn help_succeeds() {
    lindup().arg("--help").assert().success().stdout(predicate::str::contains("--preserve"));
}

#[test]
fn fail_on_missing_file() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\n");
    let missing = temp.child("missing.txt");
    lindup()
        .args([f1.as_str(), missing.path().to_str().unwrap()])
        .write_stdin("1\ny\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such file"));
    temp.child("f1.txt").assert("a\n");
}

#[test]
fn scenario_a_duplicates_of_the_preserved_file_leave_the_others() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\nb\nc\n");
    let f2 = path_with(&temp, "f2.txt", "b\nc\nd\n");
    lindup()
        .args([&f1, &f2])
        .write_stdin("1\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 duplicate line(s)"));
    temp.child("f1.txt").assert("a\nb\nc\n");
    temp.child("f2.txt").assert("d\n");
}

#[test]
fn scenario_b_add_and_remove() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\n");
    let f2 = path_with(&temp, "f2.txt", "a\nx\n");
    let f3 = path_with(&temp, "f3.txt", "x\ny\n");
    lindup().args([&f1, &f2, &f3]).write_stdin("1\n1\ny\n").assert().success();
    temp.child("f1.txt").assert("a\nx\n");
    temp.child("f2.txt").assert("");
    temp.child("f3.txt").assert("y\n");
}

#[test]
fn scenario_c_remove_from_all() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\n");
    let f2 = path_with(&temp, "f2.txt", "a\nx\n");
    let f3 = path_with(&temp, "f3.txt", "x\ny\n");
    lindup().args([&f1, &f2, &f3]).write_stdin("1\n3\ny\n").assert().success();
    temp.child("f1.txt").assert("a\n");
    temp.child("f2.txt").assert("");
    temp.child("f3.txt").assert("y\n");
}

#[test]
fn scenario_d_no_overlap_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\n\nb\n");
    let f2 = path_with(&temp, "f2.txt", "c\n\nd\n");
    lindup()
        .args([&f1, &f2])
        .assert()
        .success()
        .stdout(predicate::str::contains("No line occurs in more than one file."));
    temp.child("f1.txt").assert("a\n\nb\n");
    temp.child("f2.txt").assert("c\n\nd\n");
}

#[test]
fn declining_confirmation_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\nb\n");
    let f2 = path_with(&temp, "f2.txt", "b\nc\n");
    lindup()
        .args([&f1, &f2])
        .write_stdin("2\nnope\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    temp.child("f1.txt").assert("a\nb\n");
    temp.child("f2.txt").assert("b\nc\n");
}

#[test]
fn command_line_choices_need_no_input() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\n");
    let f2 = path_with(&temp, "f2.txt", "a\nx\n");
    let f3 = path_with(&temp, "f3.txt", "x\ny\n");
    lindup().args(["-p", "3", "-m", "remove", "-y", f1.as_str(), f2.as_str(), f3.as_str()]).assert().success();
    temp.child("f1.txt").assert("");
    temp.child("f2.txt").assert("");
    temp.child("f3.txt").assert("x\ny\n");
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\nb\n");
    let f2 = path_with(&temp, "f2.txt", "b\nc\n");
    lindup()
        .args(["--dry-run", "-p", "1", f1.as_str(), f2.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("remove 1 line(s)"));
    temp.child("f1.txt").assert("a\nb\n");
    temp.child("f2.txt").assert("b\nc\n");
}

#[test]
fn remove_from_all_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\nb\nc\n");
    let f2 = path_with(&temp, "f2.txt", "c\nd\na\n");
    let f3 = path_with(&temp, "f3.txt", "d\ne\n");
    let args = ["-p", "1", "-m", "remove", "-y", f1.as_str(), f2.as_str(), f3.as_str()];
    lindup().args(args).assert().success();
    temp.child("f1.txt").assert("a\nb\nc\n");
    temp.child("f2.txt").assert("");
    temp.child("f3.txt").assert("e\n");
    lindup()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("No line occurs in more than one file."));
    temp.child("f1.txt").assert("a\nb\nc\n");
    temp.child("f2.txt").assert("");
    temp.child("f3.txt").assert("e\n");
}

#[test]
fn the_same_file_twice_is_refused() {
    let temp = TempDir::new().unwrap();
    let f1 = path_with(&temp, "f1.txt", "a\n");
    lindup()
        .args([&f1, &f1])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("are the same file"));
    temp.child("f1.txt").assert("a\n");
}
