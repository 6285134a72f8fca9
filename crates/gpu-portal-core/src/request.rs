//! Resource request form, its validation and the submission state machine.
//!
//! ```text
//! Idle ──submit──▶ Validating ──ok──▶ Submitting ──▶ Succeeded
//!   ▲                  │                   │
//!   └──── invalid ─────┘                   └──▶ Failed ──submit──▶ …
//! ```

use crate::catalog::{self, GpuResource};
use crate::error::{Error, Result};
use crate::history::{RequestStatus, ResourceRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 4;
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 30;
pub const DEFAULT_DURATION_DAYS: u32 = 7;

pub const RESEARCH_FIELDS: [&str; 8] = [
    "Computer Vision",
    "Natural Language Processing",
    "Reinforcement Learning",
    "Generative AI",
    "Computational Biology",
    "Scientific Simulation",
    "Data Analysis",
    "Other",
];

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Resource request submitted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit request. Please try again.";

/// First failing check of a request form. Checks run in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a GPU model")]
    MissingGpuModel,
    #[error("Quantity must be between 1 and 4")]
    QuantityOutOfRange,
    #[error("Duration must be between 1 and 30 days")]
    DurationOutOfRange,
    #[error("Please select a research field")]
    MissingResearchField,
    #[error("Please enter a project name")]
    MissingProjectName,
    #[error("Please provide a project description")]
    MissingProjectDescription,
    #[error("You must agree to the terms and conditions")]
    TermsNotAccepted,
}

/// Form as typed by the user. `quantity` and `duration_days` are `None`
/// while the numeric input is blank or unparsable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct RequestForm {
    /// Catalog id of the selected GPU model
    pub gpu_model: String,
    pub quantity: Option<u32>,
    pub duration_days: Option<u32>,
    pub research_field: String,
    pub project_name: String,
    pub project_description: String,
    pub agree_to_terms: bool,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            gpu_model: String::new(),
            quantity: Some(MIN_QUANTITY),
            duration_days: Some(DEFAULT_DURATION_DAYS),
            research_field: String::new(),
            project_name: String::new(),
            project_description: String::new(),
            agree_to_terms: false,
        }
    }
}

impl RequestForm {
    /// Blank form with the GPU from the `gpu` query parameter selected.
    pub fn with_preselected_gpu(gpu: Option<&str>) -> Self {
        Self {
            gpu_model: gpu.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Parse a numeric input the way the form does: blank or junk is `None`.
    pub fn parse_number(raw: &str) -> Option<u32> {
        raw.trim().parse().ok()
    }

    /// The catalog entry currently selected, if any.
    pub fn selected_gpu<'a>(&self, catalog: &'a [GpuResource]) -> Option<&'a GpuResource> {
        catalog::find(catalog, &self.gpu_model)
    }

    pub fn validate(&self, catalog: &[GpuResource]) -> std::result::Result<ValidatedRequest, ValidationError> {
        let gpu = self
            .selected_gpu(catalog)
            .ok_or(ValidationError::MissingGpuModel)?;

        let quantity = self
            .quantity
            .filter(|q| (MIN_QUANTITY..=MAX_QUANTITY).contains(q))
            .ok_or(ValidationError::QuantityOutOfRange)?;

        let duration_days = self
            .duration_days
            .filter(|d| (MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(d))
            .ok_or(ValidationError::DurationOutOfRange)?;

        if !RESEARCH_FIELDS.contains(&self.research_field.as_str()) {
            return Err(ValidationError::MissingResearchField);
        }

        let project_name = self.project_name.trim();
        if project_name.is_empty() {
            return Err(ValidationError::MissingProjectName);
        }

        let project_description = self.project_description.trim();
        if project_description.is_empty() {
            return Err(ValidationError::MissingProjectDescription);
        }

        if !self.agree_to_terms {
            return Err(ValidationError::TermsNotAccepted);
        }

        Ok(ValidatedRequest {
            gpu_type: gpu.name.clone(),
            quantity,
            duration_days,
            research_field: self.research_field.clone(),
            project_name: project_name.to_string(),
            project_description: project_description.to_string(),
        })
    }
}

/// A form that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub gpu_type: String,
    pub quantity: u32,
    pub duration_days: u32,
    pub research_field: String,
    pub project_name: String,
    pub project_description: String,
}

impl ValidatedRequest {
    /// The pending history entry recorded for this submission.
    pub fn into_request(self, id: String, now: DateTime<Utc>) -> ResourceRequest {
        ResourceRequest {
            id,
            gpu_type: self.gpu_type,
            quantity: self.quantity,
            requested_at: now,
            start_date: None,
            end_date: None,
            status: RequestStatus::Pending,
            project_name: self.project_name,
            project_description: Some(self.project_description),
            research_field: self.research_field,
            rejection_reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }
}

/// Drives one form through validation and submission.
#[derive(Debug, Clone, Default)]
pub struct RequestWorkflow {
    form: RequestForm,
    state: SubmissionState,
}

impl RequestWorkflow {
    pub fn new(form: RequestForm) -> Self {
        Self {
            form,
            state: SubmissionState::Idle,
        }
    }

    pub fn form(&self) -> &RequestForm {
        &self.form
    }

    /// Mutable access for input handlers. Ignored edits are impossible while
    /// submitting because the UI disables the inputs.
    pub fn form_mut(&mut self) -> &mut RequestForm {
        &mut self.form
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Validate and move to `Submitting`. On a validation failure the form is
    /// left untouched and the workflow returns to `Idle`.
    pub fn submit(&mut self, catalog: &[GpuResource]) -> Result<ValidatedRequest> {
        match self.state {
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
            ref other => {
                return Err(Error::Workflow(format!(
                    "cannot submit while {:?}",
                    other
                )))
            }
        }

        self.state = SubmissionState::Validating;
        match self.form.validate(catalog) {
            Ok(validated) => {
                debug!(gpu = %validated.gpu_type, "request form valid, submitting");
                self.state = SubmissionState::Submitting;
                Ok(validated)
            }
            Err(e) => {
                debug!("request form rejected: {}", e);
                self.state = SubmissionState::Idle;
                Err(e.into())
            }
        }
    }

    /// Record the outcome of the submission call. Returns the toast text.
    pub fn complete(&mut self, outcome: std::result::Result<(), String>) -> Result<&'static str> {
        if !self.state.is_submitting() {
            return Err(Error::Workflow(format!(
                "no submission in flight ({:?})",
                self.state
            )));
        }

        match outcome {
            Ok(()) => {
                info!(project = %self.form.project_name.trim(), "resource request submitted");
                self.state = SubmissionState::Succeeded;
                Ok(SUBMIT_SUCCESS_MESSAGE)
            }
            Err(reason) => {
                self.state = SubmissionState::Failed(reason);
                Ok(SUBMIT_FAILURE_MESSAGE)
            }
        }
    }

    /// Back to a fresh form.
    pub fn reset(&mut self) {
        self.form = RequestForm::default();
        self.state = SubmissionState::Idle;
    }
}
