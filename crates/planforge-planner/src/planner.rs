//! Planner — turns a project description into a [`Plan`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use planforge_core::types::{Message, Plan, ProjectAnalysis};
use planforge_core::utils::truncate_string;
use planforge_providers::{CompletionBackend, CompletionRequest, ProviderError, RequestParams};

use crate::extract::{parse_json_reply, ExtractError};
use crate::prompt::analysis_prompt;
use crate::templates::steps_for;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Please describe the project first")]
    EmptyDescription,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Could not parse the AI analysis; check the API configuration ({0})")]
    Unparseable(#[source] ExtractError),
}

/// Who to ask and how.
#[derive(Clone, Debug, Default)]
pub struct PlanSettings {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: String,
    pub custom_endpoint: Option<String>,
    pub params: RequestParams,
}

// ─────────────────────────────────────────────
// Planner
// ─────────────────────────────────────────────

pub struct Planner {
    backend: Arc<dyn CompletionBackend>,
}

impl Planner {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Ask the model for a structured analysis of `description`.
    pub async fn analyze(
        &self,
        settings: &PlanSettings,
        description: &str,
    ) -> Result<ProjectAnalysis, PlanError> {
        if description.trim().is_empty() {
            return Err(PlanError::EmptyDescription);
        }

        let request = CompletionRequest {
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            custom_endpoint: settings.custom_endpoint.clone(),
            messages: vec![Message::user(analysis_prompt(description))],
            params: settings.params.clone(),
        };

        info!(
            provider = %settings.provider,
            backend = self.backend.display_name(),
            "Analyzing project description"
        );

        let reply = self.backend.complete(&request).await?;
        debug!(reply = %truncate_string(&reply, 200), "Model reply");

        let analysis = parse_json_reply::<ProjectAnalysis>(&reply).map_err(|e| {
            warn!(error = %e, "Analysis reply was not usable JSON");
            PlanError::Unparseable(e)
        })?;

        Ok(analysis.normalized())
    }

    /// Analyze, then expand into the checklist for the detected project type.
    pub async fn plan(&self, settings: &PlanSettings, description: &str) -> Result<Plan, PlanError> {
        let analysis = self.analyze(settings, description).await?;
        let steps = steps_for(&analysis);

        info!(
            project = %analysis.project_name,
            project_type = analysis.project_type.label(),
            steps = steps.len(),
            "Plan generated"
        );

        Ok(Plan {
            project_type: analysis.project_type,
            analysis,
            steps,
        })
    }
}
