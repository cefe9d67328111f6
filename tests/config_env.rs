// tests/config_env.rs
// Env-driven configuration. Tests mutate process env, so they run serially.

use literature_digest::config::run::{ENV_HISTORY_PATH, ENV_NCBI_API_KEY, ENV_RETMAX};
use literature_digest::config::{ENV_CATEGORIES_PATH, ENV_MIN_SCORE};
use literature_digest::{CategoryConfig, RunConfig};
use std::{env, fs, path::PathBuf};

const SMALL_TOML: &str = r#"
[scoring]
min_score = 30

[[categories]]
name = "Only"
query = "q"
"#;

fn clear() {
    env::remove_var(ENV_CATEGORIES_PATH);
    env::remove_var(ENV_MIN_SCORE);
}

#[serial_test::serial]
#[test]
fn env_path_wins_and_min_score_overrides() {
    clear();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("cats.toml");
    fs::write(&p, SMALL_TOML).unwrap();

    env::set_var(ENV_CATEGORIES_PATH, p.display().to_string());
    let cfg = CategoryConfig::load_default().unwrap();
    assert_eq!(cfg.names(), vec!["Only".to_string()]);
    assert_eq!(cfg.scoring.min_score, 30);

    env::set_var(ENV_MIN_SCORE, "12");
    let cfg = CategoryConfig::load_default().unwrap();
    assert_eq!(cfg.scoring.min_score, 12);
    clear();
}

#[serial_test::serial]
#[test]
fn missing_env_path_is_an_error() {
    clear();
    env::set_var(ENV_CATEGORIES_PATH, "/definitely/not/here.toml");
    assert!(CategoryConfig::load_default().is_err());
    clear();
}

#[serial_test::serial]
#[test]
fn falls_back_to_embedded_copy() {
    clear();
    // Isolate CWD so the repo's config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    let cfg = CategoryConfig::load_default().unwrap();
    assert_eq!(cfg.categories.len(), 4);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn run_config_reads_process_env() {
    env::set_var(ENV_RETMAX, "15");
    env::set_var(ENV_NCBI_API_KEY, "abc123");
    env::set_var(ENV_HISTORY_PATH, "state/history.json");
    let cfg = RunConfig::from_env();
    assert_eq!(cfg.retmax, 15);
    assert_eq!(cfg.api_key.as_deref(), Some("abc123"));
    assert_eq!(cfg.history_path, PathBuf::from("state/history.json"));
    for k in [ENV_RETMAX, ENV_NCBI_API_KEY, ENV_HISTORY_PATH] {
        env::remove_var(k);
    }
}
