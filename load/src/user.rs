//! One simulated user
//!
//! A user logs in once, then loops: pick a task at random, refresh the
//! anti-forgery token, issue the request, check the status, wait. Tasks that
//! target a user are skipped until `create_user` has succeeded. A failed task
//! is logged and counted; the user carries on after the next pause.
//! Every HTTP request, refreshes included, is one entry in the statistics.

use crate::error::LoadError;
use crate::metrics;
use crate::stats::LoadStats;
use crate::task::LoadTask;
use crate::wait::WaitTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use skyward_client::generate::{random_project, unique_email};
use skyward_client::{ApiResponse, Credentials, NewUser, Session, SkywardClient, UpdateUser};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Name under which the initial login appears in the statistics
pub const LOGIN: &str = "login";

/// Name under which the per-task anti-forgery refresh appears in the statistics
pub const REFRESH: &str = "refresh";

/// What happened to a task that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The request ran and returned the expected status
    Completed,
    /// The task needs a created user and there is none yet
    Skipped,
}

/// A simulated user with its own session, remembered ids and statistics
pub struct SimulatedUser {
    id: usize,
    client: SkywardClient,
    credentials: Credentials,
    session: Option<Session>,
    user_id: Option<i64>,
    project_id: Option<String>,
    wait: WaitTime,
    rng: StdRng,
    stats: LoadStats,
}

impl SimulatedUser {
    /// Create a user that will log in with `credentials`
    #[must_use]
    pub fn new(id: usize, client: SkywardClient, credentials: Credentials, wait: WaitTime) -> Self {
        Self {
            id,
            client,
            credentials,
            session: None,
            user_id: None,
            project_id: None,
            wait,
            rng: StdRng::from_entropy(),
            stats: LoadStats::default(),
        }
    }

    /// Make task choice and pauses reproducible
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Id of the user this simulated user last created
    #[must_use]
    pub const fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// Id of the project this simulated user last added.
    ///
    /// No task reads it back; it is kept for inspection and cleared together
    /// with the user id on delete.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Current session, once logged in
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Statistics so far
    #[must_use]
    pub const fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Log in.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Client` if the login is rejected or cannot be sent.
    pub async fn on_start(&mut self) -> Result<(), LoadError> {
        let started = Instant::now();
        let result = self.client.authenticate(&self.credentials).await;
        self.record(LOGIN, started.elapsed(), result.is_ok());

        self.session = Some(result?);
        info!(user = self.id, "Simulated user logged in");
        Ok(())
    }

    /// Refresh the anti-forgery token, then run one task.
    ///
    /// The refresh and the task request are recorded as separate entries, so
    /// the statistics count every HTTP request sent. A skipped task still
    /// records its refresh.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NoSession` before a successful [`on_start`](Self::on_start),
    /// `LoadError::Client` if the refresh or request fails, and
    /// `LoadError::UnexpectedStatus` if the server answers with any status
    /// other than the task's expected one.
    pub async fn run_task(&mut self, task: LoadTask) -> Result<TaskOutcome, LoadError> {
        let current = self.session.as_ref().ok_or(LoadError::NoSession)?;
        let started = Instant::now();
        let refreshed = self.client.refresh(current).await;
        self.record(REFRESH, started.elapsed(), refreshed.is_ok());
        let session = refreshed?;
        self.session = Some(session.clone());

        let user_id = match (task.needs_user(), self.user_id) {
            (true, None) => return Ok(TaskOutcome::Skipped),
            (_, id) => id.unwrap_or_default(),
        };

        let started = Instant::now();
        let result = self.request(task, &session, user_id).await;
        self.record(task.name(), started.elapsed(), result.is_ok());
        result.map(|()| TaskOutcome::Completed)
    }

    async fn request(
        &mut self,
        task: LoadTask,
        session: &Session,
        user_id: i64,
    ) -> Result<(), LoadError> {
        let response = match task {
            LoadTask::CreateUser => {
                let user = NewUser::new(unique_email("testuser"), "newpassword123", "New User");
                let response = self.client.create_user(session, &user).await?;
                expect_status(task, &response)?;
                let id = response.body()["id"]
                    .as_i64()
                    .ok_or_else(|| LoadError::MissingField {
                        task: task.name(),
                        detail: format!("response has no numeric id: {}", response.body()),
                    })?;
                self.user_id = Some(id);
                return Ok(());
            }
            LoadTask::GetUser => self.client.get_user(session, user_id).await?,
            LoadTask::DeleteUser => {
                let response = self.client.delete_user(session, user_id).await?;
                expect_status(task, &response)?;
                self.user_id = None;
                self.project_id = None;
                return Ok(());
            }
            LoadTask::AddExternalProject => {
                let project = random_project();
                let response = self
                    .client
                    .add_external_project(session, user_id, &project)
                    .await?;
                expect_status(task, &response)?;
                self.project_id = project.id;
                return Ok(());
            }
            LoadTask::GetExternalProjects => {
                self.client.list_external_projects(session, user_id).await?
            }
            LoadTask::UpdateUser => {
                let update = UpdateUser::new(
                    unique_email("updateduser"),
                    "updatedpassword123",
                    "Updated User",
                );
                self.client.update_user(session, user_id, &update).await?
            }
        };

        expect_status(task, &response)
    }

    /// Run the task loop until `shutdown` turns true or its sender is dropped.
    ///
    /// A failed login ends the run immediately. The returned statistics cover
    /// every attempt this user made.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> LoadStats {
        if let Err(e) = self.on_start().await {
            warn!(user = self.id, error = %e, "Login failed, simulated user stopping");
            return self.stats;
        }

        loop {
            if *shutdown.borrow() {
                break;
            }

            let task = LoadTask::choose(&mut self.rng);
            self.execute(task).await;

            let pause = self.wait.sample(&mut self.rng);
            tokio::select! {
                () = tokio::time::sleep(pause) => {}
                _ = shutdown.changed() => break,
            }
        }

        debug!(
            user = self.id,
            requests = self.stats.total_requests(),
            "Simulated user stopped"
        );
        self.stats
    }

    async fn execute(&mut self, task: LoadTask) {
        match self.run_task(task).await {
            Ok(TaskOutcome::Skipped) => {
                debug!(user = self.id, task = task.name(), "Skipped, no user created yet");
            }
            Ok(TaskOutcome::Completed) => {
                debug!(user = self.id, task = task.name(), "Task completed");
            }
            Err(e) => {
                warn!(user = self.id, task = task.name(), error = %e, "Task failed");
            }
        }
    }

    fn record(&mut self, name: &'static str, elapsed: Duration, success: bool) {
        self.stats.record(name, elapsed, success);
        metrics::record_task(name, success, elapsed);
    }
}

fn expect_status(task: LoadTask, response: &ApiResponse) -> Result<(), LoadError> {
    let actual = response.status().as_u16();
    if actual == task.expected_status() {
        Ok(())
    } else {
        Err(LoadError::UnexpectedStatus {
            task: task.name(),
            expected: task.expected_status(),
            actual,
        })
    }
}
