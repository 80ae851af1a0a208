use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub const DEFAULT_DETECTOR_BIN: &str = "logreduce";
pub const DEFAULT_CASE_FILE: &str = "inf.yaml";
pub const DEFAULT_CASE_PATTERN: &str = "tests/*";

// ── Top-level config ──────────────────────────────────────────

/// Harness settings resolved from the environment.
///
/// Command-line flags take precedence over every value here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Detector executable, looked up on `PATH` when not a path.
    pub detector_bin: String,
    /// Name of the definition file inside every case directory.
    pub case_file: String,
    /// Case directory glob used when no pattern is given.
    pub default_cases: String,
    /// Worker threads for case evaluation (1 = sequential).
    pub jobs: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            detector_bin: DEFAULT_DETECTOR_BIN.to_string(),
            case_file: DEFAULT_CASE_FILE.to_string(),
            default_cases: DEFAULT_CASE_PATTERN.to_string(),
            jobs: 1,
        }
    }
}

impl EvalConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LOGEVAL_PROFILE`. When set (e.g. `CI`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        Self::for_profile(&env_opt("LOGEVAL_PROFILE").unwrap_or_default())
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            detector_bin: profiled_env_or(p, "LOGEVAL_DETECTOR_BIN", DEFAULT_DETECTOR_BIN),
            case_file: profiled_env_or(p, "LOGEVAL_CASE_FILE", DEFAULT_CASE_FILE),
            default_cases: profiled_env_or(p, "LOGEVAL_CASES", DEFAULT_CASE_PATTERN),
            jobs: profiled_env_usize(p, "LOGEVAL_JOBS", 1).max(1),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Log the resolved settings at debug level.
    pub fn log_summary(&self) {
        tracing::debug!("Config loaded (profile: {}):", self.profile_label());
        tracing::debug!("  detector:    bin={}", self.detector_bin);
        tracing::debug!("  cases:       file={}, default={}", self.case_file, self.default_cases);
        tracing::debug!("  workers:     jobs={}", self.jobs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; every test uses its own profile prefix
    // so parallel tests never observe each other's values.

    #[test]
    fn profile_prefixed_values_win() {
        env::set_var("CFGTEST_LOGEVAL_DETECTOR_BIN", "/opt/logreduce/bin/logreduce");
        env::set_var("CFGTEST_LOGEVAL_JOBS", "4");

        let config = EvalConfig::for_profile("cfgtest");
        assert_eq!(config.profile, "CFGTEST");
        assert_eq!(config.detector_bin, "/opt/logreduce/bin/logreduce");
        assert_eq!(config.jobs, 4);
        assert_eq!(config.profile_label(), "CFGTEST");
    }

    #[test]
    fn invalid_job_count_falls_back() {
        env::set_var("JOBSTEST_LOGEVAL_JOBS", "many");
        assert_eq!(EvalConfig::for_profile("jobstest").jobs, 1);

        env::set_var("ZEROJOBS_LOGEVAL_JOBS", "0");
        assert_eq!(EvalConfig::for_profile("zerojobs").jobs, 1);
    }

    #[test]
    fn profile_is_read_from_environment() {
        env::set_var("ENVTEST_LOGEVAL_CASE_FILE", "case.yaml");
        env::set_var("LOGEVAL_PROFILE", "envtest");

        let config = EvalConfig::from_env();
        assert_eq!(config.profile, "ENVTEST");
        assert_eq!(config.case_file, "case.yaml");
    }

    #[test]
    fn default_is_sequential_logreduce() {
        let config = EvalConfig::default();
        assert_eq!(config.detector_bin, "logreduce");
        assert_eq!(config.case_file, "inf.yaml");
        assert_eq!(config.default_cases, "tests/*");
        assert_eq!(config.jobs, 1);
        assert_eq!(config.profile_label(), "default");
    }
}
