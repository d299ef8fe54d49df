mod common;

use common::{run_chgk, run_chgk_with_input};

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// version
// ============================================================================

#[test]
fn version_prints_package_name() {
    let output = run_chgk(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("chgk-session "));
}

#[test]
fn version_json_is_machine_readable() {
    let output = run_chgk(&["version", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["name"], "chgk-session");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

// ============================================================================
// config validate
// ============================================================================

#[test]
fn valid_config_passes() {
    let output = run_chgk(&["-q", "config", "validate", "tests/fixtures/session.yaml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("tests/fixtures/session.yaml: ok"));
}

#[test]
fn duplicate_source_ids_fail_validation() {
    let output = run_chgk(&[
        "-q",
        "config",
        "validate",
        "--format",
        "json",
        "tests/fixtures/duplicate_sources.yaml",
    ]);
    assert_eq!(output.status.code(), Some(2));

    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reports[0]["valid"], false);
    let errors = reports[0]["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("cup")));
}

#[test]
fn missing_config_file_fails() {
    let output = run_chgk(&["-q", "config", "validate", "tests/fixtures/absent.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("invalid"));
}

// ============================================================================
// catalog
// ============================================================================

#[test]
fn catalog_list_shows_selectable_games_in_configured_order() {
    let output = run_chgk(&[
        "-q",
        "catalog",
        "list",
        "--config",
        "tests/fixtures/session.yaml",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let games: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<&str> = games
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["cup", "autumn"]);
    assert_eq!(games[1]["tournaments"][2]["selectable"], false);
}

#[test]
fn catalog_list_all_includes_unplayable_games() {
    let output = run_chgk(&[
        "-q",
        "catalog",
        "list",
        "--all",
        "--config",
        "tests/fixtures/session.yaml",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("untitled  (untitled) (unavailable)"));
}

#[test]
fn catalog_show_reveals_answers() {
    let output = run_chgk(&[
        "-q",
        "catalog",
        "show",
        "two_questions",
        "-s",
        "tests/fixtures/two_questions.txt",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Кубок выходного дня"));
    assert!(text.contains("Маяк."));
    assert!(text.contains("[image: https://db.chgk.info/images/db/20150101.jpg]"));
}

#[test]
fn catalog_show_unknown_game_suggests_a_close_id() {
    let output = run_chgk(&[
        "-q",
        "catalog",
        "show",
        "kup",
        "--config",
        "tests/fixtures/session.yaml",
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("did you mean 'cup'"));
}

#[test]
fn catalog_show_unknown_tournament_fails() {
    let output = run_chgk(&[
        "-q",
        "catalog",
        "show",
        "cup",
        "-t",
        "9",
        "--config",
        "tests/fixtures/session.yaml",
    ]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn log_file_receives_catalog_events() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("chgk.log");
    let output = run_chgk(&[
        "-v",
        "--log-file",
        log.to_str().unwrap(),
        "catalog",
        "list",
        "-s",
        "tests/fixtures/two_questions.txt",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).is_empty());

    let lines = std::fs::read_to_string(&log).unwrap();
    assert!(lines.contains("game loaded"));
    assert!(lines.contains("two_questions"));
}

// ============================================================================
// play
// ============================================================================

#[test]
fn play_without_playable_games_is_a_usage_error() {
    let output = run_chgk(&["-q", "play", "-s", "tests/fixtures/no_title.txt"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(stderr(&output).contains("no playable games"));
}

#[test]
fn play_exits_cleanly_when_stdin_closes() {
    let output = run_chgk_with_input(
        &["-q", "play", "--config", "tests/fixtures/fast_timers.yaml"],
        "",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Choose a game:"));
}

#[test]
fn play_walks_menus_before_quitting() {
    let output = run_chgk_with_input(
        &["-q", "play", "--config", "tests/fixtures/fast_timers.yaml"],
        "1\n1\nq\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Choose a game:"));
    assert!(text.contains("Choose a tour:"));
    assert!(text.contains("Первый тур"));
}
