// src/config/run.rs
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_NCBI_EMAIL: &str = "NCBI_EMAIL";
pub const ENV_NCBI_API_KEY: &str = "NCBI_API_KEY";
pub const ENV_SLEEP_SECS: &str = "LITERATURE_SLEEP_SECS";
pub const ENV_DAYS_BACK: &str = "LITERATURE_DAYS_BACK";
pub const ENV_RETMAX: &str = "LITERATURE_RETMAX";
pub const ENV_SCORE_TOP_N: &str = "LITERATURE_SCORE_TOP_N";
pub const ENV_TIMEOUT_SECS: &str = "LITERATURE_TIMEOUT_SECS";
pub const ENV_PAGE_PATH: &str = "LITERATURE_PAGE_PATH";
pub const ENV_HISTORY_PATH: &str = "LITERATURE_HISTORY_PATH";
pub const ENV_MAX_HISTORY: &str = "LITERATURE_MAX_HISTORY";

pub const DEFAULT_EMAIL: &str = "example@example.com";
pub const DEFAULT_PAGE_PATH: &str = "literature.html";
pub const DEFAULT_HISTORY_PATH: &str = "literature_history.json";

/// Settings consumed by the collaborators (candidate source, page, history file).
/// The scoring/summarization core never reads these.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub email: String,
    pub api_key: Option<String>,
    /// Courtesy pause after each external call; zero disables it.
    pub politeness_delay: Duration,
    pub days_back: i64,
    /// How many ids to request per category search.
    pub retmax: usize,
    /// How many candidates are scored per category.
    pub score_top_n: usize,
    pub request_timeout: Duration,
    pub page_path: PathBuf,
    pub history_path: PathBuf,
    pub max_history: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            api_key: None,
            politeness_delay: Duration::from_millis(50),
            days_back: 365 * 2,
            retmax: 60,
            score_top_n: crate::selector::DEFAULT_MAX_CANDIDATES,
            request_timeout: Duration::from_secs(40),
            page_path: PathBuf::from(DEFAULT_PAGE_PATH),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            max_history: crate::history::DEFAULT_MAX_HISTORY,
        }
    }
}

impl RunConfig {
    /// Read settings from the process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` but with an injectable lookup, handy for tests.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let email = get(ENV_NCBI_EMAIL)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(d.email);
        let api_key = get(ENV_NCBI_API_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let politeness_delay = parse_secs_f64(get(ENV_SLEEP_SECS))
            .map(Duration::from_secs_f64)
            .unwrap_or(d.politeness_delay);

        Self {
            email,
            api_key,
            politeness_delay,
            days_back: parse_clamped(get(ENV_DAYS_BACK), 1, 365 * 20).unwrap_or(d.days_back),
            retmax: parse_clamped(get(ENV_RETMAX), 1, 10_000).unwrap_or(d.retmax),
            score_top_n: parse_clamped(get(ENV_SCORE_TOP_N), 1, 500).unwrap_or(d.score_top_n),
            request_timeout: parse_clamped(get(ENV_TIMEOUT_SECS), 1, 600)
                .map(Duration::from_secs)
                .unwrap_or(d.request_timeout),
            page_path: get(ENV_PAGE_PATH)
                .map(PathBuf::from)
                .unwrap_or(d.page_path),
            history_path: get(ENV_HISTORY_PATH)
                .map(PathBuf::from)
                .unwrap_or(d.history_path),
            max_history: parse_clamped(get(ENV_MAX_HISTORY), 1, 10_000).unwrap_or(d.max_history),
        }
    }
}

// Non-negative, finite seconds only.
fn parse_secs_f64(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.min(60.0))
}

fn parse_clamped<T>(raw: Option<String>, min: T, max: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Copy,
{
    let v = raw.and_then(|s| s.trim().parse::<T>().ok())?;
    Some(if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = RunConfig::from_lookup(|_| None);
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.email, "example@example.com");
        assert_eq!(cfg.days_back, 730);
    }

    #[test]
    fn overrides_and_clamping() {
        let cfg = RunConfig::from_lookup(lookup(&[
            (ENV_NCBI_EMAIL, " ops@clinic.example "),
            (ENV_NCBI_API_KEY, "  "),
            (ENV_SLEEP_SECS, "0"),
            (ENV_RETMAX, "0"),
            (ENV_SCORE_TOP_N, "30"),
            (ENV_DAYS_BACK, "not-a-number"),
            (ENV_PAGE_PATH, "site/literature.html"),
        ]));
        assert_eq!(cfg.email, "ops@clinic.example");
        assert_eq!(cfg.api_key, None, "blank key is treated as absent");
        assert_eq!(cfg.politeness_delay, Duration::ZERO);
        assert_eq!(cfg.retmax, 1);
        assert_eq!(cfg.score_top_n, 30);
        assert_eq!(cfg.days_back, 730);
        assert_eq!(cfg.page_path, PathBuf::from("site/literature.html"));
    }

    #[test]
    fn negative_sleep_is_ignored() {
        let cfg = RunConfig::from_lookup(lookup(&[(ENV_SLEEP_SECS, "-1")]));
        assert_eq!(cfg.politeness_delay, Duration::from_millis(50));
    }
}
