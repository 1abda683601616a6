//! Spawns simulated users, stops them, and merges their statistics

use crate::config::LoadConfig;
use crate::error::LoadError;
use crate::stats::LoadStats;
use crate::user::SimulatedUser;
use crate::wait::WaitTime;
use skyward_client::{Credentials, SkywardClient};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Runs a population of simulated users against one server.
///
/// Users are started `spawn_interval` apart, each as its own Tokio task
/// sharing the client's connection pool. When the stop condition fires, a
/// shutdown flag is broadcast; each user finishes its in-flight request and
/// returns its statistics.
#[derive(Debug, Clone)]
pub struct LoadDriver {
    client: SkywardClient,
    credentials: Credentials,
    users: usize,
    spawn_interval: Duration,
    wait: WaitTime,
    run_time: Option<Duration>,
}

impl LoadDriver {
    /// Build a driver from validated options.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Config` if the options are invalid.
    pub fn new(
        client: SkywardClient,
        credentials: Credentials,
        config: &LoadConfig,
    ) -> Result<Self, LoadError> {
        config.validate()?;
        Ok(Self {
            client,
            credentials,
            users: config.users,
            spawn_interval: config.spawn_interval(),
            wait: config.wait_time()?,
            run_time: config.run_time(),
        })
    }

    /// Run until the configured run time elapses or Ctrl+C is pressed.
    pub async fn run(self) -> LoadStats {
        let run_time = self.run_time;
        self.run_until(async move {
            match run_time {
                Some(limit) => {
                    tokio::select! {
                        () = tokio::time::sleep(limit) => {
                            info!(?limit, "Run time elapsed, stopping users");
                        }
                        () = wait_for_ctrl_c() => {}
                    }
                }
                None => wait_for_ctrl_c().await,
            }
        })
        .await
    }

    /// Run until `stop` completes.
    pub async fn run_until<F>(self, stop: F) -> LoadStats
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut handles = Vec::with_capacity(self.users);
        let mut stopped = false;
        tokio::pin!(stop);

        for id in 0..self.users {
            if id > 0 {
                tokio::select! {
                    () = tokio::time::sleep(self.spawn_interval) => {}
                    () = &mut stop => {
                        stopped = true;
                        break;
                    }
                }
            }
            let user = SimulatedUser::new(
                id,
                self.client.clone(),
                self.credentials.clone(),
                self.wait,
            );
            handles.push(tokio::spawn(user.run(shutdown_rx.clone())));
            debug!(user = id, "Spawned simulated user");
        }
        info!(users = handles.len(), "Simulated users running");

        if !stopped {
            stop.await;
        }
        shutdown_tx.send_replace(true);

        let mut stats = LoadStats::default();
        for handle in handles {
            match handle.await {
                Ok(user_stats) => stats.merge(&user_stats),
                Err(e) => error!(error = %e, "Simulated user task failed to complete"),
            }
        }
        info!(
            requests = stats.total_requests(),
            failures = stats.total_failures(),
            "Load run finished"
        );
        stats
    }
}

async fn wait_for_ctrl_c() {
    stop_signal(tokio::signal::ctrl_c()).await;
}

/// Resolve once `signal` fires. A listener that cannot be installed never
/// resolves, leaving the run time as the only stop condition.
async fn stop_signal(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Received Ctrl+C, stopping users"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C, users stop at the run time only");
            std::future::pending::<()>().await;
        }
    }
}
