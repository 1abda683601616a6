//! Command-line options for a load run

use crate::error::LoadError;
use crate::wait::WaitTime;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Options for the load driver.
///
/// Every flag falls back to a `SKYWARD_LOAD_*` environment variable. Target
/// server and credentials come from the client configuration
/// (`SKYWARD_BASE_URL`, `SKYWARD_ADMIN_EMAIL`, ...); `--host` overrides the
/// base URL only.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "skyward-load",
    about = "Drive concurrent simulated users against the Skyward API"
)]
pub struct LoadConfig {
    /// Base URL override, e.g. https://staging.example.com
    #[arg(long, env = "SKYWARD_LOAD_HOST")]
    pub host: Option<String>,

    /// Number of simulated users
    #[arg(short = 'u', long, default_value_t = 10, env = "SKYWARD_LOAD_USERS")]
    pub users: usize,

    /// Users started per second
    #[arg(short = 'r', long, default_value_t = 1.0, env = "SKYWARD_LOAD_SPAWN_RATE")]
    pub spawn_rate: f64,

    /// Stop after this many seconds (runs until Ctrl+C when absent)
    #[arg(short = 't', long, env = "SKYWARD_LOAD_RUN_TIME")]
    pub run_time: Option<u64>,

    /// Minimum pause between a user's tasks, in seconds
    #[arg(long, default_value_t = 1.0, env = "SKYWARD_LOAD_MIN_WAIT")]
    pub min_wait: f64,

    /// Maximum pause between a user's tasks, in seconds
    #[arg(long, default_value_t = 5.0, env = "SKYWARD_LOAD_MAX_WAIT")]
    pub max_wait: f64,

    /// Serve Prometheus metrics on this address, e.g. 0.0.0.0:9090
    #[arg(long, env = "SKYWARD_LOAD_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            host: None,
            users: 10,
            spawn_rate: 1.0,
            run_time: None,
            min_wait: 1.0,
            max_wait: 5.0,
            metrics_addr: None,
        }
    }
}

impl LoadConfig {
    /// Check that the options describe a runnable load.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Config` for zero users, a non-positive spawn rate,
    /// a zero run time, or an invalid wait interval.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.users == 0 {
            return Err(LoadError::Config("users must be at least 1".to_string()));
        }
        if self.try_spawn_interval().is_none() {
            return Err(LoadError::Config(format!(
                "spawn rate must be a positive number small enough to schedule, got {}",
                self.spawn_rate
            )));
        }
        if self.run_time == Some(0) {
            return Err(LoadError::Config(
                "run time must be at least 1 second".to_string(),
            ));
        }
        self.wait_time()?;
        Ok(())
    }

    /// Pause distribution between tasks.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Config` if a bound is negative or `min > max`.
    pub fn wait_time(&self) -> Result<WaitTime, LoadError> {
        WaitTime::between(
            seconds("min wait", self.min_wait)?,
            seconds("max wait", self.max_wait)?,
        )
    }

    /// Total run time, if bounded.
    #[must_use]
    pub fn run_time(&self) -> Option<Duration> {
        self.run_time.map(Duration::from_secs)
    }

    /// Delay between two consecutive user spawns.
    ///
    /// Zero when the spawn rate is not a usable positive number; `validate`
    /// rejects such rates.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        self.try_spawn_interval().unwrap_or(Duration::ZERO)
    }

    fn try_spawn_interval(&self) -> Option<Duration> {
        if self.spawn_rate.is_finite() && self.spawn_rate > 0.0 {
            Duration::try_from_secs_f64(1.0 / self.spawn_rate).ok()
        } else {
            None
        }
    }
}

fn seconds(what: &str, value: f64) -> Result<Duration, LoadError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        LoadError::Config(format!(
            "{what} must be a non-negative number of seconds, got {value}"
        ))
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoadConfig::try_parse_from(["skyward-load"]).unwrap();
        assert_eq!(config.users, 10);
        assert!(config.run_time().is_none());
        assert_eq!(config.wait_time().unwrap(), WaitTime::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_flags() {
        let config = LoadConfig::try_parse_from(["skyward-load", "-u", "50", "-r", "5", "-t", "60"])
            .unwrap();
        assert_eq!(config.users, 50);
        assert_eq!(config.spawn_interval(), Duration::from_millis(200));
        assert_eq!(config.run_time(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_metrics_addr_parsed() {
        let config =
            LoadConfig::try_parse_from(["skyward-load", "--metrics-addr", "127.0.0.1:9090"])
                .unwrap();
        assert_eq!(config.metrics_addr, Some("127.0.0.1:9090".parse().unwrap()));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let zero_users = LoadConfig {
            users: 0,
            ..LoadConfig::default()
        };
        assert!(zero_users.validate().is_err());

        let no_spawn = LoadConfig {
            spawn_rate: 0.0,
            ..LoadConfig::default()
        };
        assert!(no_spawn.validate().is_err());

        let inverted = LoadConfig {
            min_wait: 3.0,
            max_wait: 1.0,
            ..LoadConfig::default()
        };
        assert!(matches!(inverted.validate(), Err(LoadError::Config(_))));

        let negligible_rate = LoadConfig {
            spawn_rate: 1e-20,
            ..LoadConfig::default()
        };
        assert!(negligible_rate.validate().is_err());
        assert_eq!(negligible_rate.spawn_interval(), Duration::ZERO);

        let negative = LoadConfig {
            min_wait: -1.0,
            ..LoadConfig::default()
        };
        assert!(negative.validate().is_err());
    }
}
