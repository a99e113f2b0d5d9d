//! Labeling-job descriptions.

use serde::{Deserialize, Serialize};

/// Status of a job whose output manifest is final.
pub const COMPLETED: &str = "Completed";

/// The subset of a labeling-job description the converter reads.
///
/// Field names follow the labeling service's `DescribeLabelingJob` response,
/// so a saved response can be used as-is; unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeling_job_name: Option<String>,

    pub labeling_job_status: String,

    pub human_task_config: HumanTaskConfig,

    /// Absent until the job has produced output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeling_job_output: Option<LabelingJobOutput>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HumanTaskConfig {
    #[serde(default)]
    pub task_keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelingJobOutput {
    pub output_dataset_s3_uri: String,
}

impl JobDescription {
    pub fn is_completed(&self) -> bool {
        self.labeling_job_status == COMPLETED
    }

    pub fn task_keywords(&self) -> &[String] {
        &self.human_task_config.task_keywords
    }

    /// Location of the job's output manifest, if any.
    pub fn manifest_location(&self) -> Option<&str> {
        self.labeling_job_output
            .as_ref()
            .map(|output| output.output_dataset_s3_uri.as_str())
    }
}
