use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `reqguard` command isolated from the user's config and environment.
fn reqguard(config_home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("reqguard");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("REQGUARD_ROOT")
        .env_remove("REQGUARD_ALLOWED_HOSTS")
        .env_remove("REQGUARD_UPLOAD_DIR")
        .env_remove("REQGUARD_SIGNING_KEY");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reqguard"));
}

#[test]
fn test_help_contains_all_commands() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("redirect"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("hash"))
        .stdout(predicate::str::contains("token"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("sign"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_path_confined_json() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();

    let json = json_stdout(
        reqguard(home.path())
            .args(["path", "reports/./q1.csv", "--root"])
            .arg(root.path())
            .args(["--output", "json"]),
    );

    assert_eq!(json["confined"]["relative"], "reports/q1.csv");
    let confined = json["confined"]["path"].as_str().unwrap();
    let root_str = json["root"].as_str().unwrap();
    assert!(confined.starts_with(root_str));
    assert!(json["resolved"].is_null());
}

#[test]
fn test_path_traversal_rejected_without_echoing_root() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();

    reqguard(home.path())
        .args(["path", "../../etc/passwd", "--root"])
        .arg(root.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("escapes the trusted root"))
        .stderr(predicate::str::contains(root.path().to_string_lossy().as_ref()).not());
}

#[test]
fn test_path_resolve_existing_file() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("reports")).unwrap();
    std::fs::write(root.path().join("reports/q1.csv"), "a,b\n").unwrap();

    let json = json_stdout(
        reqguard(home.path())
            .args(["path", "reports/q1.csv", "--resolve", "--root"])
            .arg(root.path())
            .args(["--output", "json"]),
    );
    assert!(json["resolved"].as_str().unwrap().ends_with("q1.csv"));
}

#[test]
fn test_path_missing_root_is_config_error() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["path", "a.txt", "--root", "/definitely/not/here/reqguard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid trusted root"));
}

#[test]
fn test_upload_plain_name() {
    let home = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    let json = json_stdout(
        reqguard(home.path())
            .args(["upload", "avatar.png", "--dir"])
            .arg(uploads.path())
            .args(["--output", "json"]),
    );
    assert_eq!(json["confined"]["relative"], "avatar.png");
    let dir = json["dir"].as_str().unwrap();
    assert!(json["confined"]["path"].as_str().unwrap().starts_with(dir));
}

#[test]
fn test_upload_traversal_name_rejected() {
    let home = TempDir::new().unwrap();
    let uploads = TempDir::new().unwrap();
    reqguard(home.path())
        .env("REQGUARD_UPLOAD_DIR", uploads.path())
        .args(["upload", "../../etc/cron.d/job"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path_traversal"));
}

#[test]
fn test_redirect_allowed() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["redirect", "https://Example.com/home", "--quiet"])
        .assert()
        .success()
        .stdout("https://example.com/home\n");
}

#[test]
fn test_redirect_untrusted_host() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["redirect", "https://evil.example.com/home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untrusted_host"))
        .stderr(predicate::str::contains("--allow-host"));
}

#[test]
fn test_redirect_javascript_scheme() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["redirect", "javascript:alert(1)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported scheme"));
}

#[test]
fn test_redirect_allow_host_flag() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args([
            "redirect",
            "https://api.example.com/v1",
            "--allow-host",
            "api.example.com",
        ])
        .assert()
        .success();
}

#[test]
fn test_redirect_hosts_from_env() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .env("REQGUARD_ALLOWED_HOSTS", "a.example.com,b.example.com")
        .args(["redirect", "https://b.example.com/"])
        .assert()
        .success();
}

#[test]
fn test_query_binds_injection_as_value() {
    let home = TempDir::new().unwrap();
    let json = json_stdout(reqguard(home.path()).args([
        "query",
        "user-by-name",
        "alice' OR '1'='1",
        "--output",
        "json",
    ]));

    assert_eq!(
        json["bound"]["sql"],
        "SELECT id, name FROM users WHERE name = ?"
    );
    assert_eq!(json["bound"]["bindings"][0][1]["type"], "text");
    assert_eq!(json["bound"]["bindings"][0][1]["value"], "alice' OR '1'='1");
}

#[test]
fn test_query_negative_id_with_output_flag() {
    let home = TempDir::new().unwrap();
    let json = json_stdout(reqguard(home.path()).args([
        "query",
        "user-by-id",
        "-5",
        "--output",
        "json",
    ]));

    assert_eq!(json["bound"]["bindings"][0][1]["type"], "int");
    assert_eq!(json["bound"]["bindings"][0][1]["value"], -5);
}

#[test]
fn test_query_arity_mismatch() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["query", "delete-user", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expects 1 parameter(s), got 2"));
}

#[test]
fn test_token_is_hex() {
    let home = TempDir::new().unwrap();
    let output = reqguard(home.path()).arg("token").output().unwrap();
    assert!(output.status.success());

    let token = String::from_utf8(output.stdout).unwrap();
    let token = token.trim();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_hash_then_verify() {
    let home = TempDir::new().unwrap();
    let output = reqguard(home.path())
        .arg("hash")
        .write_stdin("correct horse battery staple\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let hash = String::from_utf8(output.stdout).unwrap().trim().to_string();
    assert!(hash.starts_with("$argon2id$"));

    reqguard(home.path())
        .args(["hash", "--verify", &hash])
        .write_stdin("correct horse battery staple\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("matches"));

    reqguard(home.path())
        .args(["hash", "--verify", &hash])
        .write_stdin("wrong\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn test_verify_rejects_foreign_hash() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["hash", "--verify", "$argon2i$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$iWh06vD8Fy27wf9npn6FXWiCX4K6pW6Ue1Bnzz07Z8A"])
        .write_stdin("secret\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported algorithm"));
}

const SIGNING_KEY: &str = "reqguard-test-signing-key-0123456789";

#[test]
fn test_sign_known_payload() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .env("REQGUARD_SIGNING_KEY", SIGNING_KEY)
        .arg("sign")
        .write_stdin("amount=10&to=alice")
        .assert()
        .success()
        .stdout("d67d0e6fd321476fb038edc0aac4e5866b54469270a0d7803c18b206382aa9f7\n");
}

#[test]
fn test_sign_verify_detects_tampering() {
    let home = TempDir::new().unwrap();
    let signature = "d67d0e6fd321476fb038edc0aac4e5866b54469270a0d7803c18b206382aa9f7";

    reqguard(home.path())
        .env("REQGUARD_SIGNING_KEY", SIGNING_KEY)
        .args(["sign", "--verify", signature])
        .write_stdin("amount=10&to=alice")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    reqguard(home.path())
        .env("REQGUARD_SIGNING_KEY", SIGNING_KEY)
        .args(["sign", "--verify", signature])
        .write_stdin("amount=10000&to=mallory")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Signature does not match"));
}

#[test]
fn test_sign_without_key_has_no_fallback() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .arg("sign")
        .write_stdin("payload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no signing key configured"))
        .stderr(predicate::str::contains("REQGUARD_SIGNING_KEY"));
}

#[test]
fn test_fetch_blocks_metadata_address() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["fetch", "http://169.254.169.254/latest/meta-data/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untrusted host"));
}

#[test]
fn test_config_check_with_file() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let file = home.path().join("custom.toml");
    std::fs::write(
        &file,
        format!(
            "root = {:?}\nallowed_hosts = [\"Example.com\", \"api.example.com\"]\n",
            root.path().display().to_string()
        ),
    )
    .unwrap();

    let json = json_stdout(
        reqguard(home.path())
            .args(["config", "check", "--config"])
            .arg(&file)
            .args(["--output", "json"]),
    );
    assert_eq!(
        json["allowed_hosts"],
        serde_json::json!(["api.example.com", "example.com"])
    );
    assert_eq!(json["verify_tls"], true);
}

#[test]
fn test_config_check_invalid_host() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    reqguard(home.path())
        .env("REQGUARD_ROOT", root.path())
        .env("REQGUARD_ALLOWED_HOSTS", "https://example.com")
        .args(["config", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bare hostnames"));
}

#[test]
fn test_config_show_yaml() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["config", "show", "--output", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed_hosts"))
        .stdout(predicate::str::contains("verify_tls"));
}

#[test]
fn test_completion_bash() {
    let home = TempDir::new().unwrap();
    reqguard(home.path())
        .args(["completion", "generate", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reqguard"));
}
