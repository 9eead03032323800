use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Fixture helpers ────────────────────────────────────────────────────────

/// Snapshot with:
///   - 7 linked accounts (two sharing the display name "alice")
///   - 4 posts across zora, paragraph and an unknown platform
///   - earnings on Zora (with link), Farcaster (link from the account handle)
///     and a zero-amount Pods entry
const SNAPSHOT: &str = r#"{
    "identifier": "alice.eth",
    "socialAccounts": [
        { "source": "farcaster", "displayName": "alice", "handle": "@alice", "followerCount": 5000, "profileUrl": "https://farcaster.xyz/alice" },
        { "source": "lens", "displayName": "alice", "followerCount": 1000 },
        { "source": "x", "displayName": "Alice X", "followerCount": 3000, "profileUrl": "https://x.com/alice" },
        { "source": "zora", "followerCount": 500 },
        { "source": "mirror", "followerCount": 400 },
        { "source": "paragraph", "followerCount": 300 },
        { "source": "base", "followerCount": 200 }
    ],
    "posts": [
        { "platform": "zora", "title": "gm" },
        { "platform": "zora" },
        { "platform": "paragraph" },
        { "platform": "substack" }
    ],
    "earnings": [
        { "name": "Zora", "amount": 1500.0, "url": "https://zora.co/@alice" },
        { "name": "Farcaster", "amount": 500.0 },
        { "name": "Pods", "amount": 0.0 }
    ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(dir.path().join("snapshot.json"), SNAPSHOT).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn snapshot(&self) -> PathBuf {
        self.path("snapshot.json")
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }
}

/// Command isolated from the user's config and environment overrides.
fn cmd_with_config(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("creatorscore").unwrap();
    cmd.env("CREATORSCORE_CONFIG", config)
        .env_remove("CREATORSCORE_TOP_K")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn cmd(fixture: &Fixture) -> Command {
    cmd_with_config(&fixture.path("no-config.toml"))
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ── Help ───────────────────────────────────────────────────────────────────

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("creatorscore").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Creator profile stats breakdowns"));
}

#[test]
fn test_stats_command_help() {
    let mut cmd = Command::cargo_bin("creatorscore").unwrap();
    cmd.arg("stats")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--top-k"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("creatorscore").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("creatorscore"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("creatorscore").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

#[test]
fn test_missing_snapshot_argument() {
    let mut cmd = Command::cargo_bin("creatorscore").unwrap();
    cmd.arg("stats").assert().failure();
}

// ── JSON output ────────────────────────────────────────────────────────────

#[test]
fn test_stats_json() {
    let fixture = Fixture::new();
    let json = json_output(cmd(&fixture).arg("stats").arg(fixture.snapshot()).arg("--json"));

    assert_eq!(json["identifier"], "alice.eth");

    let followers = &json["followers"];
    assert_eq!(followers["grandTotal"], 10400);
    let segments = followers["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 6);
    assert_eq!(segments[0]["name"], "alice");
    assert_eq!(segments[0]["value"], 6000);
    assert_eq!(segments[0]["url"], "https://farcaster.xyz/alice");
    assert_eq!(segments[5]["name"], "Other");
    assert_eq!(segments[5]["value"], 200);

    let posts = json["posts"]["segments"].as_array().unwrap();
    assert_eq!(json["posts"]["grandTotal"], 4);
    assert_eq!(posts[0]["name"], "Zora");
    assert_eq!(posts[1]["name"], "Paragraph");
    assert_eq!(posts[2]["name"], "substack");

    let earnings = &json["earnings"];
    assert_eq!(earnings["grandTotal"].as_f64(), Some(2000.0));
    let earning_segments = earnings["segments"].as_array().unwrap();
    assert_eq!(earning_segments.len(), 2);
    assert_eq!(earning_segments[0]["url"], "https://zora.co/@alice");
    assert_eq!(earning_segments[1]["url"], "https://farcaster.xyz/alice");
}

#[test]
fn test_followers_json_single_section() {
    let fixture = Fixture::new();
    let json = json_output(
        cmd(&fixture)
            .arg("followers")
            .arg(fixture.snapshot())
            .arg("--json"),
    );

    assert_eq!(json["grandTotal"], 10400);
    assert!(json.get("posts").is_none());

    let total: f64 = json["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["percentage"].as_f64().unwrap())
        .sum();
    assert!((total - 100.0).abs() < 1e-6);
}

#[test]
fn test_top_k_flag() {
    let fixture = Fixture::new();
    let json = json_output(
        cmd(&fixture)
            .arg("followers")
            .arg(fixture.snapshot())
            .arg("--json")
            .arg("--top-k")
            .arg("2"),
    );

    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0]["name"], "alice");
    assert_eq!(segments[1]["name"], "Alice X");
    assert_eq!(segments[2]["name"], "Other");
    assert_eq!(segments[2]["value"], 1400);
}

#[test]
fn test_top_k_env_var() {
    let fixture = Fixture::new();
    let json = json_output(
        cmd(&fixture)
            .env("CREATORSCORE_TOP_K", "1")
            .arg("posts")
            .arg(fixture.snapshot())
            .arg("--json"),
    );

    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["name"], "Zora");
    assert_eq!(segments[1]["name"], "Other");
    assert_eq!(segments[1]["value"], 2);
}

#[test]
fn test_config_file_labels_and_other_label() {
    let fixture = Fixture::new();
    let config = fixture.write(
        "config.toml",
        "[breakdown]\ntop_k = 1\nother_label = \"Rest\"\n\n[labels]\nzora = \"Zora Network\"\n",
    );

    let json = json_output(
        cmd_with_config(&config)
            .arg("posts")
            .arg(fixture.snapshot())
            .arg("--json"),
    );

    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments[0]["name"], "Zora Network");
    assert_eq!(segments[1]["name"], "Rest");
}

#[test]
fn test_stdin_snapshot() {
    let fixture = Fixture::new();
    let json = json_output(
        cmd(&fixture)
            .arg("posts")
            .arg("-")
            .arg("--json")
            .write_stdin(SNAPSHOT),
    );
    assert_eq!(json["grandTotal"], 4);
}

#[test]
fn test_empty_snapshot_json() {
    let fixture = Fixture::new();
    let empty = fixture.write("empty.json", "{}");
    let json = json_output(cmd(&fixture).arg("stats").arg(&empty).arg("--json"));

    assert_eq!(json["followers"]["grandTotal"], 0);
    assert_eq!(json["followers"]["segments"].as_array().unwrap().len(), 0);
    assert_eq!(json["posts"]["segments"].as_array().unwrap().len(), 0);
}

// ── Text output ────────────────────────────────────────────────────────────

#[test]
fn test_stats_text_output() {
    let fixture = Fixture::new();
    cmd(&fixture)
        .arg("stats")
        .arg(fixture.snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains("alice.eth"))
        .stdout(predicate::str::contains("Total Earnings  $2.0K"))
        .stdout(predicate::str::contains("Total Followers  10,400"))
        .stdout(predicate::str::contains("Total Posts  4"))
        .stdout(predicate::str::contains("Other"))
        .stdout(predicate::str::contains("57.7%"));
}

#[test]
fn test_light_table_output() {
    let fixture = Fixture::new();
    cmd(&fixture)
        .arg("earnings")
        .arg(fixture.snapshot())
        .arg("--light")
        .assert()
        .success()
        .stdout(predicate::str::contains("Share"))
        .stdout(predicate::str::contains("https://farcaster.xyz/alice"))
        .stdout(predicate::str::contains("Total Earnings: $2.0K"));
}

#[test]
fn test_empty_breakdown_text() {
    let fixture = Fixture::new();
    let empty = fixture.write("empty.json", r#"{ "posts": [] }"#);
    cmd(&fixture)
        .arg("posts")
        .arg(&empty)
        .assert()
        .success()
        .stdout(predicate::str::contains("No data"));
}

#[test]
fn test_malformed_section_reports_error_and_keeps_others() {
    let fixture = Fixture::new();
    let partial = fixture.write(
        "partial.json",
        r#"{ "posts": [{ "platform": "lens" }], "earnings": { "total": 10 } }"#,
    );

    cmd(&fixture)
        .arg("stats")
        .arg(&partial)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Posts  1"))
        .stdout(predicate::str::contains("expected a sequence"))
        .stderr(predicate::str::contains("dropping malformed snapshot section"));
}

#[test]
fn test_width_flag_sets_bar_cells() {
    let fixture = Fixture::new();
    cmd(&fixture)
        .arg("posts")
        .arg(fixture.snapshot())
        .arg("--width")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("  ██▓▒\n"));
}

#[test]
fn test_width_flag_out_of_range() {
    let fixture = Fixture::new();
    for width in ["0", "401", "18446744073709551615"] {
        cmd(&fixture)
            .arg("posts")
            .arg(fixture.snapshot())
            .arg("--width")
            .arg(width)
            .assert()
            .failure()
            .stderr(predicate::str::contains("--width"));
    }
}

// ── Errors ─────────────────────────────────────────────────────────────────

#[test]
fn test_missing_snapshot_file() {
    let fixture = Fixture::new();
    cmd(&fixture)
        .arg("stats")
        .arg(fixture.path("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load snapshot"));
}

#[test]
fn test_invalid_snapshot_json() {
    let fixture = Fixture::new();
    let invalid = fixture.write("invalid.json", "[1, 2, 3]");
    cmd(&fixture)
        .arg("stats")
        .arg(&invalid)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON object"));
}

// ── Labels ─────────────────────────────────────────────────────────────────

#[test]
fn test_labels_json() {
    let fixture = Fixture::new();
    let json = json_output(cmd(&fixture).arg("labels").arg("--json"));
    assert_eq!(json["farcaster"], "Farcaster");
    assert_eq!(json["paragraph"], "Paragraph");
}

#[test]
fn test_labels_table() {
    let fixture = Fixture::new();
    cmd(&fixture)
        .arg("labels")
        .assert()
        .success()
        .stdout(predicate::str::contains("Platform"))
        .stdout(predicate::str::contains("Mirror"));
}
