//! API response projections for the Jenkins JSON API

use chrono::{
    DateTime,
    Utc,
};
use serde::Deserialize;

/// CSRF protection token issued by `/crumbIssuer/api/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Crumb {
    pub crumb: String,
    #[serde(rename = "crumbRequestField")]
    pub crumb_request_field: String,
}

/// Job status ball color. `Disabled` doubles as the disabled sentinel;
/// the `*Anime` variants indicate a build in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum JobColor {
    #[serde(rename = "blue")]
    Blue,
    #[serde(rename = "blue_anime")]
    BlueAnime,
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "red_anime")]
    RedAnime,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "yellow_anime")]
    YellowAnime,
    #[serde(rename = "aborted")]
    Aborted,
    #[serde(rename = "aborted_anime")]
    AbortedAnime,
    #[serde(rename = "notbuilt")]
    NotBuilt,
    #[serde(rename = "notbuilt_anime")]
    NotBuiltAnime,
    #[serde(rename = "disabled")]
    Disabled,
    #[serde(other)]
    Unknown,
}

impl JobColor {
    pub fn is_disabled(&self) -> bool {
        matches!(self, JobColor::Disabled)
    }

    pub fn is_building(&self) -> bool {
        matches!(
            self,
            JobColor::BlueAnime
                | JobColor::RedAnime
                | JobColor::YellowAnime
                | JobColor::AbortedAnime
                | JobColor::NotBuiltAnime
        )
    }
}

/// Final verdict of a completed build. `None` on a [`Build`] means the
/// build is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BuildResult {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
    #[serde(rename = "UNSTABLE")]
    Unstable,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(rename = "NOT_BUILT")]
    NotBuilt,
    #[serde(other)]
    Unknown,
}

/// Full job projection as returned by `/job/{name}/api/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub color: Option<JobColor>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "lastBuild")]
    #[serde(default)]
    pub last_build: Option<BuildRef>,
    #[serde(rename = "inQueue")]
    #[serde(default)]
    pub in_queue: bool,
    #[serde(rename = "queueItem")]
    #[serde(default)]
    pub queue_item: Option<QueueItemRef>,
}

/// Summary row from the `jobs` array of `/api/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub color: Option<JobColor>,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "lastBuild")]
    #[serde(default)]
    pub last_build: Option<BuildRef>,
    #[serde(rename = "queueItem")]
    #[serde(default)]
    pub queue_item: Option<QueueItemRef>,
}

/// Lightweight pointer to a build, as embedded in job projections.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRef {
    pub number: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// Pointer to a pending queue item embedded in a job projection.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueItemRef {
    pub id: i64,
    #[serde(default)]
    pub why: Option<String>,
}

/// One numbered execution of a job.
#[derive(Debug, Clone, Deserialize)]
pub struct Build {
    pub number: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(rename = "queueId")]
    #[serde(default)]
    pub queue_id: Option<i64>,
}

impl Build {
    /// Start time derived from the server's epoch-millis timestamp.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp > 0 {
            chrono::DateTime::from_timestamp_millis(self.timestamp).map(|dt| dt.with_timezone(&Utc))
        } else {
            None
        }
    }
}

/// A pending build request, before an executor is allocated.
///
/// The `executable` field appears once the server schedules the build;
/// `cancelled` or a 404 on re-read means it never will.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueItem {
    pub id: i64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub executable: Option<Executable>,
}

/// The queue item's reference to the realized build once scheduled.
#[derive(Debug, Clone, Deserialize)]
pub struct Executable {
    pub number: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// Full view projection from `/view/{name}/api/json`, including member
/// job summaries.
#[derive(Debug, Clone, Deserialize)]
pub struct View {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

/// Summary row from the `views` array of `/api/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Aggregated test-report summary from `/job/{name}/{n}/testReport`.
#[derive(Debug, Clone, Deserialize)]
pub struct TestReport {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub empty: bool,
    #[serde(rename = "passCount")]
    #[serde(default)]
    pub pass_count: i64,
    #[serde(rename = "failCount")]
    #[serde(default)]
    pub fail_count: i64,
    #[serde(rename = "skipCount")]
    #[serde(default)]
    pub skip_count: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobsEnvelope {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewsEnvelope {
    #[serde(default)]
    pub views: Vec<ViewSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BuildsEnvelope {
    #[serde(default)]
    pub builds: Vec<Build>,
}
