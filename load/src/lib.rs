//! # Skyward Load Driver
//!
//! Simulated users that log in, then repeatedly pick one of six API
//! operations at random, pausing between tasks. A run spawns many users
//! concurrently, stops them after a fixed time or on Ctrl+C, and reports
//! per-task request counts, failures and latency.
//!
//! ## Example
//!
//! ```no_run
//! use skyward_client::{ClientConfig, SkywardClient};
//! use skyward_load::{LoadConfig, LoadDriver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client_config = ClientConfig::from_env()?;
//!     let client = SkywardClient::new(&client_config)?;
//!     let load = LoadConfig {
//!         users: 25,
//!         run_time: Some(60),
//!         ..LoadConfig::default()
//!     };
//!
//!     let driver = LoadDriver::new(client, client_config.credentials, &load)?;
//!     let stats = driver.run().await;
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod stats;
pub mod task;
pub mod user;
pub mod wait;

pub use config::LoadConfig;
pub use driver::LoadDriver;
pub use error::LoadError;
pub use stats::{LoadStats, TaskStats};
pub use task::LoadTask;
pub use user::{SimulatedUser, TaskOutcome};
pub use wait::WaitTime;
