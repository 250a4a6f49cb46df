mod helpers;

use draftsim_cli::logging::init_test_logging;
use helpers::{path_str, run_cli, write_catalog, write_starved_catalog};
use serial_test::serial;
use tracing::Level;

#[test]
#[serial]
fn failed_trial_logs_warning_then_error() {
    let logs = init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_starved_catalog(dir.path());
    let res = run_cli(&[
        "simulate", "--catalog", path_str(&catalog), "--set", "tst", "--trials", "1", "--seed",
        "3", "--archetype", "WU",
    ]);
    assert_eq!(res.code, 2);

    let warnings = logs.at_level(Level::WARN);
    assert!(warnings.iter().any(|e| {
        e.message.contains("retrying") && e.fields.iter().any(|(k, v)| k == "trial" && v == "0")
    }));
    let errors = logs.at_level(Level::ERROR);
    assert!(errors.iter().any(|e| e.message.contains("after retry")));
}

#[test]
#[serial]
fn successful_run_logs_start_and_finish() {
    let logs = init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let res = run_cli(&[
        "simulate", "--catalog", path_str(&catalog), "--set", "tst", "--trials", "3", "--seed",
        "8",
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let infos = logs.at_level(Level::INFO);
    assert!(infos.iter().any(|e| e.message.contains("finished")));
    assert!(logs.at_level(Level::ERROR).is_empty());
}
