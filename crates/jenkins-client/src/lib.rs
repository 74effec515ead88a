//! Async client for the Jenkins HTTP management API
//!
//! Lets automation code create, inspect, modify, and delete jobs, views,
//! and builds, and drive the asynchronous trigger → queue → build
//! lifecycle to completion without a human operator:
//! - Job CRUD, enable/disable, and config.xml round-tripping with
//!   caller-supplied text transforms
//! - Build triggering (plain and parameterized), queue-item resolution,
//!   console output, test reports, stop/delete
//! - View CRUD and job-to-view membership
//! - CSRF crumb handling, basic-auth transport, typed errors
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//! - `client` - client construction over the shared transport
//! - `transport` - authenticated HTTP plumbing and the crumb cache
//! - `jobs` / `builds` / `views` - one endpoint family each
//! - `queue` - polling waits for the queue/build state machine
//! - `types` - serde projections of the server's JSON API
//! - `xml` - opaque-text config transforms
//!
//! # Example
//!
//! ```no_run
//! use jenkins_client::{ClientConfig, JenkinsClient, PollPolicy, QueueOutcome};
//!
//! # async fn run() -> jenkins_client::Result<()> {
//! let client = JenkinsClient::new(
//!     ClientConfig::new("http://localhost:8080").basic_auth("jenkins", "api-token"),
//! )?;
//!
//! let queue_id = client.build("my-job").await?;
//! match client.wait_for_start(queue_id, &PollPolicy::default()).await? {
//!     QueueOutcome::Started { number } => {
//!         let build = client
//!             .wait_for_completion("my-job", number, &PollPolicy::default())
//!             .await?;
//!         println!("finished: {:?}", build.result);
//!     }
//!     QueueOutcome::Cancelled => println!("never ran"),
//! }
//! # Ok(())
//! # }
//! ```

mod builds;
mod client;
mod config;
mod error;
mod jobs;
mod queue;
mod transport;
mod types;
mod views;
pub mod xml;

pub use client::JenkinsClient;
pub use config::ClientConfig;
pub use error::{
    Error,
    Result,
};
pub use queue::{
    PollPolicy,
    QueueOutcome,
};
pub use types::{
    Build,
    BuildRef,
    BuildResult,
    Crumb,
    Executable,
    Job,
    JobColor,
    JobSummary,
    QueueItem,
    QueueItemRef,
    TestReport,
    View,
    ViewSummary,
};
