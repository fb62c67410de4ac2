//! The analysis prompt sent to the model.

/// JSON shape the model is asked to return. Keys match
/// [`ProjectAnalysis`](planforge_core::types::ProjectAnalysis).
const ANALYSIS_SCHEMA: &str = r#"{
  "projectType": "web_app|game|tool",
  "projectName": "project name taken from the request",
  "complexity": "low|medium|high",
  "estimatedHours": "estimated development hours (number)",
  "mainFeatures": ["main feature 1", "main feature 2", "..."],
  "technicalChallenges": ["technical challenge 1", "technical challenge 2", "..."],
  "recommendedTech": ["recommended technology 1", "recommended technology 2", "..."],
  "developmentPhases": [
    {
      "phase": "phase name",
      "description": "phase description",
      "tasks": ["task 1", "task 2", "..."],
      "estimatedHours": "estimated hours for this phase"
    }
  ],
  "riskFactors": ["risk 1", "risk 2", "..."],
  "recommendations": ["recommendation 1", "recommendation 2", "..."],
  "successCriteria": ["success criterion 1", "success criterion 2", "..."]
}"#;

/// Build the prompt asking the model to analyse `description`.
pub fn analysis_prompt(description: &str) -> String {
    format!(
        "As an experienced software project planner and technical lead, analyse the \
         following request and return the analysis as JSON.\n\n\
         Request: {}\n\n\
         Return exactly this JSON structure (JSON only, no other text):\n{}",
        description.trim(),
        ANALYSIS_SCHEMA
    )
}
