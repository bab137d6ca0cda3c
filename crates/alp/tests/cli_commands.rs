#![cfg(feature = "cli")]

use std::process::Command;

fn alp(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_alp"))
        .args(args)
        .output()
        .expect("binary should run")
}

#[test]
fn compose_read_file_emits_reference_bytes() {
    let out = alp(&[
        "compose",
        "read-file",
        "--file-id",
        "5",
        "--length",
        "10",
    ]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "0105000000000a"
    );
}

#[test]
fn decode_lists_actions_in_order() {
    let out = alp(&["decode", "0105000000000a"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("0: ReadFileData"), "stdout: {stdout}");
    assert!(stdout.contains("length: 10"), "stdout: {stdout}");
}

#[test]
fn compose_and_decode_are_symmetric() {
    let out = alp(&[
        "compose",
        "--tag",
        "33",
        "--respond-when-completed",
        "write-file",
        "--file-id",
        "9",
        "--data",
        "d00dfeed",
        "--response",
    ]);
    assert!(out.status.success());
    let hex = String::from_utf8_lossy(&out.stdout).trim().to_string();

    let out = alp(&["decode", &hex]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("0: RequestTag"), "stdout: {stdout}");
    assert!(stdout.contains("1: WriteFileData"), "stdout: {stdout}");
}

#[test]
fn response_length_matches_return_action_size() {
    let out = alp(&["response-length", "0105000000000a"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "17");
}

#[test]
fn unknown_opcode_exits_data_invalid() {
    let out = alp(&["decode", "03"]);
    assert_eq!(out.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown ALP operation"), "stderr: {stderr}");
}

#[test]
fn odd_hex_exits_usage() {
    let out = alp(&["decode", "012"]);
    assert_eq!(out.status.code(), Some(64));
}
