use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn boardedit_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("boardedit").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

fn write_script(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("edit.script");
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    boardedit_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Scriptable editing core for 2D board layouts",
        ));
}

#[test]
fn list_actions_shows_syntax() {
    let temp = TempDir::new().unwrap();
    boardedit_cmd(&temp)
        .arg("--list-actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("ChangeSize(selector, value[, unit])"))
        .stdout(predicate::str::contains("Polygon(Close|PreviousPoint)"));
}

#[test]
fn script_file_builds_board() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
        &temp,
        "# two vias and a line\n\
         @mode via\n\
         @click 10mm 10mm\n\
         @click 20mm 10mm\n\
         @mode line\n\
         @click 10mm 20mm\n\
         @click 30mm 20mm\n\
         @cancel\n\
         Select(SelectedVias); Select(All)\n\
         ChangeDrillSize(SelectedVias, =0.3mm)\n",
    );
    boardedit_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .arg("--dump-board")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Via\""))
        .stdout(predicate::str::contains("\"Line\""))
        .stdout(predicate::str::contains("\"drill\": 300000"));
}

#[test]
fn script_from_stdin() {
    let temp = TempDir::new().unwrap();
    boardedit_cmd(&temp)
        .arg("--dump-board")
        .write_stdin("@mode polygon\n@click 1mm 1mm\n@click 9mm 1mm\n@click 9mm 9mm\n@close\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Polygon\""));
}

#[test]
fn failing_line_aborts_with_line_number() {
    let temp = TempDir::new().unwrap();
    let script = write_script(&temp, "Undo()\nChangeSize(Everything, +1mil)\nFrob()\n");
    boardedit_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2: unknown target 'Everything'"))
        .stderr(predicate::str::contains("Frob").not());
}

#[test]
fn keep_going_reports_every_failure() {
    let temp = TempDir::new().unwrap();
    let script = write_script(&temp, "Frob()\n@mode via\n@teleport\n@click 5mm 5mm\n");
    boardedit_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .args(["--keep-going", "--dump-board"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"Via\""))
        .stderr(predicate::str::contains("line 1: unknown action 'Frob'"))
        .stderr(predicate::str::contains("line 3: unknown directive '@teleport'"));
}

#[test]
fn explicit_config_is_applied() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(
        &config,
        "[editing]\ngrid = \"1mm\"\ninitial_mode = \"via\"\n[defaults]\nvia_drill = \"0.4mm\"\n",
    )
    .unwrap();
    boardedit_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .arg("--dump-board")
        .write_stdin("@click 10.4mm 9.6mm\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"x\": 10000000"))
        .stdout(predicate::str::contains("\"drill\": 400000"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("broken.toml");
    std::fs::write(&config, "[editing\n").unwrap();
    boardedit_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn init_config_writes_example() {
    let temp = TempDir::new().unwrap();
    boardedit_cmd(&temp)
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(temp.path().join("boardedit").join("config.toml").exists());

    boardedit_cmd(&temp)
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
