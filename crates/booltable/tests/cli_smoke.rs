use assert_cmd::Command;
use insta::assert_snapshot;
use predicates::prelude::*;

fn booltable(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("booltable").expect("binary exists");
    cmd.current_dir(dir)
        .env_remove("BOOLTABLE_BASE_URL")
        .env_remove("BOOLTABLE_EXPORT_FORMAT")
        .env_remove("BOOLTABLE_MATCH_MODE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_displays_usage() {
    let temp = tempfile::tempdir().unwrap();
    booltable(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("table"));
}

#[test]
fn table_prints_json_rows() {
    let temp = tempfile::tempdir().unwrap();
    let output = booltable(temp.path())
        .args(["table", " a , b ,,"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_snapshot!(stdout.trim_end(), @r###"
[
  {
    "a": false,
    "b": false
  },
  {
    "a": false,
    "b": true
  },
  {
    "a": true,
    "b": false
  },
  {
    "a": true,
    "b": true
  }
]
"###);
}

#[test]
fn table_prints_markdown() {
    let temp = tempfile::tempdir().unwrap();
    let output = booltable(temp.path())
        .args(["table", "x,y", "--format", "markdown"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_snapshot!(stdout.trim_end(), @r###"
| x | y |
| --- | --- |
| false | false |
| false | true |
| true | false |
| true | true |
"###);
}

#[test]
fn empty_options_print_empty_array() {
    let temp = tempfile::tempdir().unwrap();
    booltable(temp.path())
        .args(["table", ""])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn url_uses_configured_base() {
    let temp = tempfile::tempdir().unwrap();
    booltable(temp.path())
        .args(["url", "a,b"])
        .env("BOOLTABLE_BASE_URL", "https://truth.example/")
        .assert()
        .success()
        .stdout("https://truth.example/?options=a%2Cb\n");
}

#[test]
fn workspace_config_selects_format() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join(".git")).unwrap();
    std::fs::create_dir_all(temp.path().join(".booltable")).unwrap();
    std::fs::write(
        temp.path().join(".booltable/config.toml"),
        "[defaults]\nexport_format = \"markdown\"\n",
    )
    .unwrap();

    booltable(temp.path())
        .args(["table", "solo"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("| solo |"));
}

#[test]
fn completions_are_generated() {
    let temp = tempfile::tempdir().unwrap();
    booltable(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("booltable"));
}
