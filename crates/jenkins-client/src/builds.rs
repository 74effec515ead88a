//! Build triggering, inspection, and lifecycle operations

use tracing::debug;

use crate::client::JenkinsClient;
use crate::config::job_path;
use crate::error::{
    Error,
    Result,
};
use crate::types::{
    Build,
    BuildsEnvelope,
    QueueItem,
    TestReport,
};

const BUILD_LIST_TREE: &str = "builds[number,url,result,building,timestamp,duration,queueId]";

impl JenkinsClient {
    /// Triggers an unparameterized build.
    ///
    /// The server accepts the request into its queue and answers with a
    /// bodyless redirect; the returned queue id is parsed from the
    /// trailing segment of the `Location` header. Poll
    /// [`queue_item`](Self::queue_item) (or use
    /// [`wait_for_start`](Self::wait_for_start)) to learn the build
    /// number once an executor picks it up.
    pub async fn build(&self, name: &str) -> Result<i64> {
        debug!(name, "triggering build");
        let location = self
            .transport
            .post_for_location(&format!("/job/{}/build", job_path(name)), None)
            .await?;
        parse_queue_id(&location)
    }

    /// Triggers a parameterized build; `params` are sent form-encoded.
    pub async fn build_with_params<I, K, V>(&self, name: &str, params: I) -> Result<i64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let form: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        debug!(name, params = form.len(), "triggering parameterized build");
        let location = self
            .transport
            .post_for_location(
                &format!("/job/{}/buildWithParameters", job_path(name)),
                Some(&form),
            )
            .await?;
        parse_queue_id(&location)
    }

    /// Single-shot read of a queue item's current state.
    ///
    /// Once the item leaves the queue the server eventually answers 404;
    /// callers polling for a build number should treat that as terminal
    /// cancellation, not retry forever (`wait_for_start` does).
    pub async fn queue_item(&self, queue_id: i64) -> Result<QueueItem> {
        self.transport
            .get_json(&format!("/queue/item/{queue_id}/api/json"))
            .await
    }

    /// Lists all recorded builds for a job, newest first.
    pub async fn all_builds(&self, name: &str) -> Result<Vec<Build>> {
        let envelope: BuildsEnvelope = self
            .transport
            .get_json(&format!(
                "/job/{}/api/json?tree={BUILD_LIST_TREE}",
                job_path(name)
            ))
            .await?;
        Ok(envelope.builds)
    }

    /// Projection of one build. `result` is `None` while `building`.
    pub async fn build_info(&self, name: &str, number: i64) -> Result<Build> {
        let build: Build = self
            .transport
            .get_json(&format!("/job/{}/{}/api/json", job_path(name), number))
            .await?;
        Ok(normalize(build))
    }

    /// Projection of the most recent build.
    pub async fn last_build_info(&self, name: &str) -> Result<Build> {
        let build: Build = self
            .transport
            .get_json(&format!("/job/{}/lastBuild/api/json", job_path(name)))
            .await?;
        Ok(normalize(build))
    }

    /// Requests an abort. The server acknowledges with a text body;
    /// the `building=false` / `result=Aborted` transition lands
    /// asynchronously, so re-read [`build_info`](Self::build_info) (or
    /// use [`wait_for_completion`](Self::wait_for_completion)) to
    /// observe it.
    pub async fn stop_build(&self, name: &str, number: i64) -> Result<String> {
        debug!(name, number, "stopping build");
        self.transport
            .post(&format!("/job/{}/{}/stop", job_path(name), number))
            .await
    }

    /// Accumulated console log as of this call. Append-only; partial
    /// while the build is still running.
    pub async fn console_output(&self, name: &str, number: i64) -> Result<String> {
        self.transport
            .get_text(&format!("/job/{}/{}/consoleText", job_path(name), number))
            .await
    }

    /// Removes one build record.
    pub async fn delete_build(&self, name: &str, number: i64) -> Result<()> {
        debug!(name, number, "deleting build");
        self.transport
            .post(&format!("/job/{}/{}/doDelete", job_path(name), number))
            .await?;
        Ok(())
    }

    /// Structured test-report summary for a build. [`Error::NotFound`]
    /// when the build produced no report.
    pub async fn test_result(&self, name: &str, number: i64) -> Result<TestReport> {
        self.transport
            .get_json(&format!(
                "/job/{}/{}/testReport/api/json",
                job_path(name),
                number
            ))
            .await
    }

    /// Test-report summary for the most recent build.
    pub async fn last_build_report(&self, name: &str) -> Result<TestReport> {
        let build = self.last_build_info(name).await?;
        self.test_result(name, build.number).await
    }
}

/// A running build must not claim a verdict yet, whatever the server's
/// projection says mid-transition.
fn normalize(mut build: Build) -> Build {
    if build.building {
        build.result = None;
    }
    build
}

/// Extracts the queue id from the trailing path segment of a build
/// trigger's `Location` header, e.g.
/// `http://jenkins.example.com/queue/item/123/` → `123`.
fn parse_queue_id(location: &str) -> Result<i64> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<i64>().ok())
        .ok_or_else(|| {
            Error::MalformedResponse(format!("No queue id in Location header: {location}"))
        })
}
