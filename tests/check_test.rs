use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run driftspec with given args and colors disabled.
fn driftspec() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("driftspec");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// An environment with one instance and one security group.
fn env_json(instance_type: &str, from_port: u32, owner: &str) -> String {
    format!(
        r#"{{
  "resources": [
    {{
      "type": "aws_instance",
      "name": "web",
      "attrs": {{ "instance_type": "{instance_type}", "tags": {{ "Owner": "{owner}", "Team": "core" }} }}
    }},
    {{
      "type": "aws_security_group",
      "name": "web",
      "blocks": {{ "ingress": [{{ "attrs": {{ "from_port": {from_port}, "protocol": "tcp" }} }}] }}
    }}
  ]
}}"#
    )
}

fn project(dev: &str, prod: &str) -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("dev/main.json").write_str(dev).unwrap();
    dir.child("prod/main.json").write_str(prod).unwrap();
    dir
}

// ─── Drift detection ────────────────────────────────────────────

#[test]
fn identical_environments_pass() {
    let env = env_json("t2.micro", 80, "a");
    let dir = project(&env, &env);

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Baseline: dev"))
        .stdout(predicate::str::contains("No drift detected."))
        .stdout(predicate::str::contains("Drift: 0"));
}

#[test]
fn drift_fails_with_report() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "| resource | aws_instance.web | instance_type | t2.micro | t2.large |",
        ))
        .stdout(predicate::str::contains("Drift: 1"))
        .stderr(predicate::str::contains("1 configuration drift(s) detected"));
}

#[test]
fn no_fail_reports_but_succeeds() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drift: 1"));
}

#[test]
fn fail_on_drift_can_be_disabled_in_config() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );
    dir.child(".driftspec/config.toml")
        .write_str("[driftspec]\nversion = \"0.1.0\"\n\n[report]\nfail_on_drift = false\n")
        .unwrap();

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success();
}

// ─── Ignore rules ───────────────────────────────────────────────

#[test]
fn ignored_differences_are_listed_with_reasons() {
    let dir = project(
        &env_json("t2.micro", 80, "alice"),
        &env_json("t2.large", 8080, "bob"),
    );
    dir.child(".driftspec/.driftignore")
        .write_str(
            "# prod needs more capacity\n\
             aws_instance.web.instance_type\n\
             \n\
             aws_security_group.web.ingress[0]   # public port differs\n\
             aws_instance.web.tags.Owner\n",
        )
        .unwrap();

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No drift detected."))
        .stdout(predicate::str::contains("## Ignored differences"))
        .stdout(predicate::str::contains("| prod needs more capacity |"))
        .stdout(predicate::str::contains(
            "| ingress[0].from_port | 80 | 8080 | public port differs |",
        ))
        .stdout(predicate::str::contains("| tags.Owner | alice | bob | - |"))
        .stdout(predicate::str::contains("Intentional differences: 3"));
}

#[test]
fn tag_change_reports_only_that_tag() {
    let dir = project(
        &env_json("t2.micro", 80, "alice"),
        &env_json("t2.micro", 80, "bob"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tags.Owner"))
        .stdout(predicate::str::contains("tags.Team").not());
}

#[test]
fn stale_rule_warns_on_stderr() {
    let env = env_json("t2.micro", 80, "a");
    let dir = project(&env, &env);
    dir.child(".driftspec/.driftignore")
        .write_str("aws_instance.ghost\n")
        .unwrap();

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "ignore rule 'aws_instance.ghost' not found in current resource configuration",
        ));
}

#[test]
fn ignore_directory_reads_txt_files() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );
    dir.child(".driftspec/.driftignore/compute.txt")
        .write_str("aws_instance.web\n")
        .unwrap();

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Intentional differences: 1"));
}

// ─── Environment sources ────────────────────────────────────────

#[test]
fn explicit_files_in_mixed_formats() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("envs/dev.json")
        .write_str(r#"{ "locals": { "region": "eu-west-1" } }"#)
        .unwrap();
    dir.child("envs/prod.toml")
        .write_str("[locals]\nregion = \"us-east-1\"\n")
        .unwrap();

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail", "envs/dev.json", "envs/prod.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "| local | local.region | - | eu-west-1 | us-east-1 |",
        ));
}

#[test]
fn excluded_directories_are_skipped() {
    let dir = project(&env_json("t2.micro", 80, "a"), &env_json("t2.micro", 80, "a"));
    dir.child("scratch/main.json")
        .write_str(&env_json("m5.large", 80, "a"))
        .unwrap();

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--exclude-dirs", "scratch,tmp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Environments: dev, prod"));
}

#[test]
fn missing_environments_fail() {
    let dir = assert_fs::TempDir::new().unwrap();

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No environments found"));
}

#[test]
fn malformed_environment_fails() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        r#"{ "resources": [{ "type": "aws_instance", "name": "" }] }"#,
    );

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Environment 'prod' is malformed"));
}

#[test]
fn unknown_document_field_fails() {
    let dir = project(&env_json("t2.micro", 80, "a"), r#"{ "providers": [] }"#);

    driftspec()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

// ─── Output ─────────────────────────────────────────────────────

#[test]
fn json_report_written_to_file() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail", "--format", "json", "-o", "report.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to report.json"));

    let content = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["baseline"], "dev");
    assert_eq!(json["summary"]["drift"], 1);
    assert_eq!(json["differences"][0]["path"], "instance_type");
    assert_eq!(json["differences"][0]["actual"], "t2.large");
}

#[test]
fn bare_output_flag_writes_into_config_dir() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail", "-o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"))
        .stdout(predicate::str::contains("| t2.micro | t2.large |").not());

    dir.child(".driftspec/report.md")
        .assert(predicate::str::contains("# Drift Check Results"))
        .assert(predicate::str::contains(
            "| resource | aws_instance.web | instance_type | t2.micro | t2.large |",
        ));
}

#[test]
fn bare_output_flag_follows_config_override() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail", "--config", "settings", "-o"])
        .assert()
        .success();

    dir.child("settings/report.md")
        .assert(predicate::str::contains("t2.large"));
    dir.child(".driftspec/report.md")
        .assert(predicate::path::missing());
}

#[test]
fn trim_cell_drops_table_padding() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail", "--trim-cell"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "|resource|aws_instance.web|instance_type|t2.micro|t2.large|",
        ))
        .stdout(predicate::str::contains("| t2.micro |").not());
}

#[test]
fn quiet_mode_prints_nothing_on_success() {
    let env = env_json("t2.micro", 80, "a");
    let dir = project(&env, &env);

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn long_values_are_truncated() {
    let dir = project(
        &env_json("t2.micro", 80, "a"),
        &env_json("t2.large", 80, "a"),
    );

    driftspec()
        .current_dir(dir.path())
        .args(["check", "--no-fail", "--max-value-length", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| t2... | t2... |"));
}
