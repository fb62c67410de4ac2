//! Planning pipeline for Planforge.
//!
//! description → [`prompt::analysis_prompt`] → model → [`extract::parse_json_reply`]
//! → [`templates::steps_for`] → [`Plan`](planforge_core::types::Plan).

pub mod extract;
pub mod planner;
pub mod prompt;
pub mod templates;

pub use extract::{extract_json_object, parse_json_reply, repair_truncated, ExtractError};
pub use planner::{PlanError, PlanSettings, Planner};
pub use prompt::analysis_prompt;
pub use templates::steps_for;
