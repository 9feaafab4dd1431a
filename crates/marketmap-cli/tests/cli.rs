//! Command-line tests for the marketmap binary.

use assert_cmd::Command;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/market.yaml")
}

fn marketmap() -> Command {
    Command::cargo_bin("marketmap").unwrap()
}

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_check_fixture() {
    let out = stdout_of(marketmap().arg("check").arg(fixture()));
    assert!(out.contains("Snapshot valid!"));
    assert!(out.contains("Groups: 5"));
    assert!(out.contains("Leaves: 12"));
    assert!(out.contains("Empty groups: 1"));
}

#[test]
fn test_check_rejects_bad_snapshot() {
    let file = temp_file(".yaml", "groups:\n  a:\n    label: A\n    items:\n      - { id: \"\", name: x, weight: 1 }\n");
    marketmap().arg("check").arg(file.path()).assert().failure();
}

#[test]
fn test_check_unknown_extension() {
    let file = temp_file(".csv", "groups: {}\n");
    marketmap().arg("check").arg(file.path()).assert().failure();
}

#[test]
fn test_layout_text() {
    let out = stdout_of(marketmap().arg("layout").arg(fixture()));
    // banking carries the most weight
    assert!(out.lines().next().unwrap().starts_with("banking 银行"));
    assert!(out.contains("  600519 贵州茅台 -0.82%"));
    assert!(out.contains("  601288 农业银行 0.00%"));
}

#[test]
fn test_layout_json() {
    let out = stdout_of(
        marketmap()
            .arg("layout")
            .arg(fixture())
            .args(["--format", "json", "--width", "390", "--height", "844"]),
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["groups"].as_array().unwrap().len(), 5);
    assert!(value["rects"]["market"].is_object());
    assert!(value["rects"]["600519"].is_object());
}

#[test]
fn test_layout_rejects_zero_width() {
    marketmap()
        .arg("layout")
        .arg(fixture())
        .args(["--width", "0"])
        .assert()
        .failure();
}

#[test]
fn test_render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.svg");
    marketmap()
        .arg("render")
        .arg(fixture())
        .arg("--out")
        .arg(&out)
        .args(["--profile", "desktop"])
        .assert()
        .success();
    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("工商银行"));
}

#[test]
fn test_render_with_settings() {
    let settings = temp_file(".yaml", "snap: none\nprofiles:\n  desktop:\n    group_header_height: 30\n");
    let out = stdout_of(
        marketmap()
            .arg("render")
            .arg(fixture())
            .arg("--config")
            .arg(settings.path()),
    );
    assert!(out.contains("</svg>"));
}

#[test]
fn test_render_rejects_invalid_settings() {
    let settings = temp_file(".yaml", "profiles:\n  desktop:\n    max_chars: 0\n");
    marketmap()
        .arg("render")
        .arg(fixture())
        .arg("--config")
        .arg(settings.path())
        .assert()
        .failure();
}

#[test]
fn test_link_fallback() {
    let out = stdout_of(marketmap().args(["link", "000858"]));
    assert_eq!(out.trim(), "https://quote.eastmoney.com/sz000858.html");
    let out = stdout_of(marketmap().args(["link", "830799"]));
    assert_eq!(out.trim(), "https://quote.eastmoney.com/bj830799.html");
}

#[test]
fn test_link_known() {
    let out = stdout_of(marketmap().args([
        "link",
        "600519",
        "--known",
        "600519=https://example.com/maotai",
    ]));
    assert_eq!(out.trim(), "https://example.com/maotai");
}
