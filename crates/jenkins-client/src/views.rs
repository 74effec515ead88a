//! View CRUD and job-to-view membership

use tracing::debug;

use crate::client::JenkinsClient;
use crate::config::encode_segment;
use crate::error::{
    Error,
    Result,
};
use crate::types::{
    JobSummary,
    View,
    ViewSummary,
    ViewsEnvelope,
};

const LIST_VIEW_MODE: &str = "hudson.model.ListView";

impl JenkinsClient {
    /// Creates an empty list view.
    pub async fn create_view(&self, name: &str) -> Result<View> {
        debug!(name, "creating view");
        let form = vec![
            ("name".to_string(), name.to_string()),
            ("mode".to_string(), LIST_VIEW_MODE.to_string()),
            (
                "json".to_string(),
                serde_json::json!({ "name": name, "mode": LIST_VIEW_MODE }).to_string(),
            ),
        ];
        self.transport
            .post_form(&format!("/createView?name={}", encode_segment(name)), &form)
            .await?;
        self.view_info(name).await
    }

    /// Full view projection, including member job summaries.
    pub async fn view_info(&self, name: &str) -> Result<View> {
        self.transport
            .get_json(&format!("/view/{}/api/json", encode_segment(name)))
            .await
    }

    /// Lists every view's summary.
    pub async fn all_views(&self) -> Result<Vec<ViewSummary>> {
        let envelope: ViewsEnvelope = self
            .transport
            .get_json("/api/json?tree=views[name,url]")
            .await?;
        Ok(envelope.views)
    }

    /// Full-replace update of a view's configuration.
    ///
    /// `config` is the complete replacement payload (filters, columns,
    /// description), passed through verbatim — it is the server's
    /// schema, not the client's. Membership changes do not need this:
    /// see [`add_job_to_view`](Self::add_job_to_view).
    pub async fn update_view(&self, name: &str, config: serde_json::Value) -> Result<View> {
        debug!(name, "updating view");
        let form = vec![("json".to_string(), config.to_string())];
        self.transport
            .post_form(
                &format!("/view/{}/configSubmit", encode_segment(name)),
                &form,
            )
            .await?;
        self.view_info(name).await
    }

    /// Deletes a view, returning its last projection.
    pub async fn delete_view(&self, name: &str) -> Result<View> {
        let view = self.view_info(name).await?;
        debug!(name, "deleting view");
        self.transport
            .post(&format!("/view/{}/doDelete", encode_segment(name)))
            .await?;
        Ok(view)
    }

    /// Idempotent delete: `Ok(None)` when the view was already absent.
    pub async fn delete_view_if_exists(&self, name: &str) -> Result<Option<View>> {
        match self.delete_view(name).await {
            Ok(view) => Ok(Some(view)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Member jobs of a view.
    pub async fn all_jobs_in_view(&self, name: &str) -> Result<Vec<JobSummary>> {
        Ok(self.view_info(name).await?.jobs)
    }

    /// Adds a job to a view without touching the rest of the view's
    /// configuration.
    pub async fn add_job_to_view(&self, view: &str, job: &str) -> Result<()> {
        debug!(view, job, "adding job to view");
        self.transport
            .post(&format!(
                "/view/{}/addJobToView?name={}",
                encode_segment(view),
                encode_segment(job)
            ))
            .await?;
        Ok(())
    }

    /// Removes a job from a view; the job itself is unaffected.
    pub async fn remove_job_from_view(&self, view: &str, job: &str) -> Result<()> {
        debug!(view, job, "removing job from view");
        self.transport
            .post(&format!(
                "/view/{}/removeJobFromView?name={}",
                encode_segment(view),
                encode_segment(job)
            ))
            .await?;
        Ok(())
    }
}
