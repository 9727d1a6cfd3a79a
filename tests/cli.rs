//! Integration tests for the omnirender binary.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const TEMPLATE: &str = "\
external_url 'https://gitlab.{{ domain }}/'
nginx['listen_port'] = 8181
gitlab_rails['smtp_address'] = \"{{ smtp_host }}\"
gitlab_rails['smtp_port'] = {{ smtp_port }}
";

const VARS: &str = "\
domain: example.org
smtp_host: mail.example.org
smtp_port: 587
";

/// Helper: a project directory with a template and a context file.
fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("gitlab.rb.tmpl"), TEMPLATE).expect("Failed to write template");
    fs::write(dir.path().join("vars.yaml"), VARS).expect("Failed to write vars");
    dir
}

fn omnirender(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.current_dir(root).env_remove("OMNIRENDER_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    omnirender(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("vars"));
}

#[test]
fn test_render_to_file() {
    let dir = project();

    omnirender(dir.path())
        .args(["render", "-t", "gitlab.rb.tmpl", "-c", "vars.yaml", "-o", "gitlab.rb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered"));

    let out = fs::read_to_string(dir.path().join("gitlab.rb")).unwrap();
    assert!(out.contains("external_url 'https://gitlab.example.org/'"));
    assert!(out.contains("gitlab_rails['smtp_port'] = 587"));
}

#[test]
fn test_render_to_stdout() {
    let dir = project();

    omnirender(dir.path())
        .args(["render", "-t", "gitlab.rb.tmpl", "-c", "vars.yaml", "-o", "-"])
        .args(["--set", "domain=example.net"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://gitlab.example.net/"))
        .stdout(predicate::str::contains("Rendered").not());
}

#[test]
fn test_missing_key_exits_1() {
    let dir = project();
    fs::write(dir.path().join("vars.yaml"), "domain: example.org\n").unwrap();

    omnirender(dir.path())
        .args(["render", "-t", "gitlab.rb.tmpl", "-c", "vars.yaml", "-o", "gitlab.rb"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing key 'smtp_host'"));

    assert!(!dir.path().join("gitlab.rb").exists());
}

#[test]
fn test_malformed_template_exits_1() {
    let dir = project();
    fs::write(dir.path().join("gitlab.rb.tmpl"), "port = {{ smtp_port").unwrap();

    omnirender(dir.path())
        .args(["render", "-t", "gitlab.rb.tmpl", "-c", "vars.yaml", "-o", "-"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed placeholder"));
}

#[test]
fn test_schema_violation_exits_2() {
    let dir = project();
    fs::write(dir.path().join("schema.yaml"), "smtp_port: port\n").unwrap();

    omnirender(dir.path())
        .args(["render", "-t", "gitlab.rb.tmpl", "-c", "vars.yaml", "-o", "gitlab.rb"])
        .args(["-s", "schema.yaml", "--set", "smtp_port=70000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Schema validation failed"))
        .stderr(predicate::str::contains("smtp_port"));

    assert!(!dir.path().join("gitlab.rb").exists());
}

#[test]
fn test_project_config_is_discovered() {
    let dir = project();
    fs::write(
        dir.path().join("omnirender.yaml"),
        "template: gitlab.rb.tmpl\ncontext: [vars.yaml]\nout: gitlab.rb\n",
    )
    .unwrap();

    omnirender(dir.path()).arg("render").assert().success();
    assert!(dir.path().join("gitlab.rb").exists());
}

#[test]
fn test_env_prefix() {
    let dir = project();

    omnirender(dir.path())
        .env("OMNI_SMTP_HOST", "relay.example.org")
        .args(["render", "-t", "gitlab.rb.tmpl", "-c", "vars.yaml", "-o", "-"])
        .args(["--env-prefix", "OMNI_"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"relay.example.org\""));
}

#[test]
fn test_check_rendered_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gitlab.rb"), "smtp_port = 587\n").unwrap();
    fs::write(dir.path().join("ok.yaml"), "smtp_port: port\n").unwrap();
    fs::write(dir.path().join("bad.yaml"), "smtp_port: bool\n").unwrap();

    omnirender(dir.path())
        .args(["check", "--file", "gitlab.rb", "--schema", "ok.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 field(s) valid"));

    omnirender(dir.path())
        .args(["check", "--file", "gitlab.rb", "--schema", "bad.yaml"])
        .assert()
        .code(2);
}

#[test]
fn test_vars_json() {
    let dir = project();

    omnirender(dir.path())
        .args(["vars", "-t", "gitlab.rb.tmpl", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"smtp_port\""));
}

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    omnirender(dir.path()).arg("frobnicate").assert().failure();
}
