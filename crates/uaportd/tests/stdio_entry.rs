//! Integration tests for the `uaportd` binary on its stdio channel.

use std::io::{Cursor, Write};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use serde_json::{Value, json};
use tempfile::NamedTempFile;

use uaport_config::HeaderWidth;
use uaportd::transport::{FrameReader, FrameWriter};

fn framed(width: HeaderWidth, payloads: &[Value]) -> Vec<u8> {
    let mut writer = FrameWriter::new(Vec::new(), width);
    for payload in payloads {
        let bytes = serde_json::to_vec(payload).expect("encode command");
        writer.write_message(&bytes).expect("frame command");
    }
    writer.into_inner()
}

fn replies(width: HeaderWidth, stdout: Vec<u8>) -> Vec<Value> {
    let mut reader = FrameReader::new(Cursor::new(stdout), width);
    let mut values = Vec::new();
    while let Some(payload) = reader.read_message().expect("read reply frame") {
        values.push(serde_json::from_slice(&payload).expect("reply should be JSON"));
    }
    values
}

#[test]
fn serves_seeded_nodes_until_stdin_closes() {
    let mut seed = NamedTempFile::new().expect("create seed file");
    seed.write_all(br#"{"temp1": 71.5}"#).expect("write seed file");
    let input = framed(
        HeaderWidth::Two,
        &[
            json!({"method": "read_item", "args": "temp1"}),
            json!({"method": "connect", "args": {"url": "opc.tcp://10.0.0.1:4840"}}),
            json!({"method": "read_items", "args": ["temp1", "bad/path"]}),
        ],
    );

    let mut command = cargo_bin_cmd!("uaportd");
    command
        .env("UAPORT_LOG_FILTER", "off")
        .arg("--header-width")
        .arg("2")
        .arg("--nodes")
        .arg(seed.path())
        .write_stdin(input);
    let output = command.assert().success().get_output().stdout.clone();

    assert_eq!(
        replies(HeaderWidth::Two, output),
        vec![
            json!("no connection"),
            json!("ok"),
            json!([71.5, "error: BadNodeIdUnknown"]),
        ]
    );
}

#[test]
fn truncated_input_exits_with_failure() {
    let mut command = cargo_bin_cmd!("uaportd");
    command
        .env("UAPORT_LOG_FILTER", "off")
        .write_stdin(vec![0x00, 0x00, 0x00]);
    command.assert().failure().stdout(predicates::str::is_empty());
}

#[test]
fn unsupported_header_width_is_rejected() {
    let mut command = cargo_bin_cmd!("uaportd");
    command.arg("--header-width").arg("3");
    command.assert().failure().stderr(contains("header-width"));
}

#[test]
fn help_describes_the_gateway() {
    let mut command = cargo_bin_cmd!("uaportd");
    command.arg("--help");
    command.assert().success().stdout(contains("--header-width"));
}
