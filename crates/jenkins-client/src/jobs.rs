//! Job CRUD, configuration round-tripping, and enable/disable

use tracing::debug;

use crate::client::JenkinsClient;
use crate::config::{
    encode_segment,
    job_path,
};
use crate::error::{
    Error,
    Result,
};
use crate::types::{
    Job,
    JobSummary,
    JobsEnvelope,
};
use crate::xml;

const JOB_LIST_TREE: &str = "jobs[name,color,buildable,url,lastBuild[number,url],queueItem[id,why]]";

impl JenkinsClient {
    /// Lists every job's summary projection.
    pub async fn all_jobs(&self) -> Result<Vec<JobSummary>> {
        let envelope: JobsEnvelope = self
            .transport
            .get_json(&format!("/api/json?tree={JOB_LIST_TREE}"))
            .await?;
        Ok(envelope.jobs)
    }

    /// Full projection of one job.
    pub async fn job_info(&self, name: &str) -> Result<Job> {
        self.transport
            .get_json(&format!("/job/{}/api/json", job_path(name)))
            .await
    }

    /// Creates a job from an XML configuration document.
    ///
    /// An already-taken name surfaces as [`Error::Server`] with the
    /// server's 400 body; Jenkins exposes no structured conflict code.
    pub async fn create_job(&self, name: &str, config_xml: &str) -> Result<Job> {
        debug!(name, "creating job");
        self.transport
            .post_xml(
                &format!("/createItem?name={}", encode_segment(name)),
                config_xml,
            )
            .await?;
        self.job_info(name).await
    }

    /// Deletes a job and all of its build history.
    ///
    /// Returns the job's last projection before deletion; fails with
    /// [`Error::NotFound`] if the job does not exist.
    pub async fn delete_job(&self, name: &str) -> Result<Job> {
        let job = self.job_info(name).await?;
        debug!(name, "deleting job");
        self.transport
            .post(&format!("/job/{}/doDelete", job_path(name)))
            .await?;
        Ok(job)
    }

    /// Idempotent delete: `Ok(None)` when the job was already absent.
    pub async fn delete_job_if_exists(&self, name: &str) -> Result<Option<Job>> {
        match self.delete_job(name).await {
            Ok(job) => Ok(Some(job)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Raw configuration document for a job.
    pub async fn get_config_xml(&self, name: &str) -> Result<String> {
        self.transport
            .get_text(&format!("/job/{}/config.xml", job_path(name)))
            .await
    }

    /// Fetch-transform-write over a job's configuration.
    ///
    /// Not guarded against concurrent external modification: the server
    /// provides no optimistic-concurrency token for this endpoint, so
    /// the last writer wins.
    pub async fn update_config<F>(&self, name: &str, transform: F) -> Result<Job>
    where
        F: FnOnce(&str) -> String,
    {
        let current = self.get_config_xml(name).await?;
        let updated = xml::apply_transform(&current, transform)?;
        self.transport
            .post_xml(&format!("/job/{}/config.xml", job_path(name)), &updated)
            .await?;
        self.job_info(name).await
    }

    /// Server-side copy of `src` into a new job `dst`, then a
    /// fetch-transform-write of the copy's configuration. `src` is left
    /// untouched.
    pub async fn copy_job<F>(&self, src: &str, dst: &str, transform: F) -> Result<Job>
    where
        F: FnOnce(&str) -> String,
    {
        debug!(src, dst, "copying job");
        self.transport
            .post(&format!(
                "/createItem?name={}&mode=copy&from={}",
                encode_segment(dst),
                encode_segment(src)
            ))
            .await?;
        self.update_config(dst, transform).await
    }

    /// Re-enables a disabled job. The returned projection reflects the
    /// toggle immediately; the server applies it synchronously.
    pub async fn enable_job(&self, name: &str) -> Result<Job> {
        self.transport
            .post(&format!("/job/{}/enable", job_path(name)))
            .await?;
        self.job_info(name).await
    }

    /// Disables a job: `buildable` drops to `false` and `color` flips to
    /// the disabled sentinel.
    pub async fn disable_job(&self, name: &str) -> Result<Job> {
        self.transport
            .post(&format!("/job/{}/disable", job_path(name)))
            .await?;
        self.job_info(name).await
    }
}
