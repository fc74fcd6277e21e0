// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;

use std::process::Command;

use common::*;

fn cocli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cocli"))
}

#[test]
fn sign_prints_confirmation_and_exits_zero() {
    let ws = Workspace::new();
    let out = cocli()
        .args(["corim", "sign", "-f"])
        .arg(ws.path("unsigned.cbor"))
        .arg("-m")
        .arg(ws.path("meta.json"))
        .arg("-k")
        .arg(ws.path("key.jwk"))
        .arg("--output")
        .arg(ws.path("signed.cbor"))
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with(">> "));
    assert!(stdout.contains("signed and saved to"));
    assert!(stdout.contains("signed.cbor"));
    assert!(exists(&ws.path("signed.cbor")));
}

#[test]
fn missing_key_flag_exits_nonzero() {
    let ws = Workspace::new();
    let out = cocli()
        .args(["corim", "sign", "--file"])
        .arg(ws.path("unsigned.cbor"))
        .arg("--meta")
        .arg(ws.path("meta.json"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no key supplied"));
    assert!(!exists(&ws.path("signed-unsigned.cbor")));
}

#[test]
fn intermediates_without_cert_exits_nonzero() {
    let ws = Workspace::new();
    ws.write("chain.der", &cert_der("i1.example"));
    let out = cocli()
        .args(["corim", "sign", "-f"])
        .arg(ws.path("unsigned.cbor"))
        .arg("-m")
        .arg(ws.path("meta.json"))
        .arg("-k")
        .arg(ws.path("key.jwk"))
        .arg("--intermediates")
        .arg(ws.path("chain.der"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr)
        .contains("cannot add intermediate certificates without a signing certificate"));
}
