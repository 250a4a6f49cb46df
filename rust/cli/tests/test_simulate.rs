mod helpers;

use helpers::{path_str, run_cli, write_catalog};

fn simulate_args<'a>(catalog: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["simulate", "--catalog", catalog, "--set", "tst"];
    args.extend_from_slice(extra);
    args
}

#[test]
fn simulate_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "20", "--seed", "42", "--archetype", "WU"],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res
        .stdout
        .starts_with("Simulated 20 decks from TST (seed 42, mode fixed)"));
    assert!(res.stdout.contains("Top cards:"));
    assert!(res.stdout.contains("Average curve per deck:"));
    assert!(res.stdout.contains("WU"));
    assert!(!res.stdout.contains("By archetype"));
}

#[test]
fn same_seed_prints_the_same_summary() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let args = simulate_args(path_str(&catalog), &["--trials", "15", "--seed", "7"]);
    let first = run_cli(&args);
    let second = run_cli(&args);
    assert_eq!(first.code, 0, "stderr: {}", first.stderr);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn weighted_run_reports_per_archetype_tables() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "60", "--seed", "3", "--weights", "WU=0.5,BR=0.5"],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("mode weighted"));
    assert!(res.stdout.contains("By archetype:"));
    assert!(res.stdout.contains("Azorius"));
    assert!(res.stdout.contains("Rakdos"));
}

#[test]
fn rows_csv_has_a_line_per_deck_spell() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let rows = dir.path().join("out").join("rows.csv");
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "5", "--seed", "1", "--rows", path_str(&rows)],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Wrote 115 card rows"));

    let text = std::fs::read_to_string(&rows).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("trial,archetype,card_id"));
    assert_eq!(lines.len(), 1 + 5 * 23);
}

#[test]
fn rows_jsonl_and_sqlite_match_the_deck_count() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let jsonl = dir.path().join("rows.jsonl");
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "4", "--seed", "9", "--rows", path_str(&jsonl), "--rows-format", "jsonl"],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let text = std::fs::read_to_string(&jsonl).unwrap();
    assert_eq!(text.lines().count(), 4 * 23);
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["trial"], 0);

    let db = dir.path().join("rows.sqlite");
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "4", "--seed", "9", "--rows", path_str(&db), "--rows-format", "sqlite"],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let conn = rusqlite::Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM card_rows", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 4 * 23);
}

#[test]
fn report_json_carries_run_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let report = dir.path().join("report.json");
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "10", "--seed", "42", "--report", path_str(&report)],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(v["set_code"], "tst");
    assert_eq!(v["base_seed"], 42);
    assert_eq!(v["trials"], 10);
    assert!(v["generated_at"].as_str().is_some_and(|s| s.ends_with('Z')));
    assert!(v["top_cards"].as_array().is_some_and(|a| !a.is_empty()));
}

#[test]
fn trial_log_has_one_record_per_trial() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let log = dir.path().join("trials.jsonl");
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "6", "--seed", "11", "--trial-log", path_str(&log)],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Wrote 6 trial records"));

    let text = std::fs::read_to_string(&log).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 6);
    for (i, r) in records.iter().enumerate() {
        assert_eq!(r["trial"], i);
        assert_eq!(r["base_seed"], 11);
        assert_eq!(r["spells"].as_array().map(|s| s.len()), Some(23));
        assert!(r["ts"].is_string());
    }
}

#[test]
fn ignored_flag_is_warned_about() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let res = run_cli(&simulate_args(
        path_str(&catalog),
        &["--trials", "3", "--seed", "5", "--mode", "auto", "--archetype", "WU"],
    ));
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("mode auto"));
    assert!(res.stderr.contains("archetype"));
}
