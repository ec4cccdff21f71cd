//! Integration test: the `dine` binary's exit status and output streams.

use std::process::{Command, Output};

fn dine(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dine"))
        .args(args)
        .env_remove("DINE_AGENTS")
        .env_remove("DINE_DAWDLE_MS")
        .env_remove("DINE_LOG")
        .output()
        .expect("failed to launch dine")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn valid_run_prints_the_table_and_succeeds() {
    let out = dine(&["2", "--dawdle-ms", "0", "--seed", "1"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    // Header (3) + initial row + 5 agents * 2 reps * 6 changes + footer.
    assert_eq!(lines.len(), 3 + 1 + 60 + 1);
    assert_eq!(lines[0], lines[2]);
    assert_eq!(lines[0], *lines.last().unwrap());
    assert!(lines[1].contains('A') && lines[1].contains('E'));
}

#[test]
fn verify_and_agents_flags() {
    let out = dine(&["3", "-n", "3", "--dawdle-ms", "1", "--verify"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).lines().count(), 3 + 1 + 3 * 3 * 6 + 1);
}

#[test]
fn zero_repetitions_fail_before_running() {
    let out = dine(&["0", "--dawdle-ms", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains('0'));
}

#[test]
fn negative_repetitions_fail() {
    let out = dine(&["-3", "--dawdle-ms", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("-3"));
}

#[test]
fn non_numeric_repetitions_fail() {
    let out = dine(&["abc", "--dawdle-ms", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("abc"));
}

#[test]
fn single_agent_rejected() {
    let out = dine(&["1", "-n", "1", "--dawdle-ms", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
}

#[test]
fn bad_flag_exits_one() {
    let out = dine(&["--no-such-flag"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn help_exits_zero() {
    let out = dine(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("REPETITIONS"));
}
