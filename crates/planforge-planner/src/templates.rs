//! Phase templates: four checklist steps per project type, each with a prompt
//! ready to paste into a coding assistant.

use planforge_core::types::{PlanStep, ProjectAnalysis, ProjectType, StepKind};

/// Shown in place of an empty list.
pub const NONE_SPECIFIED: &str = "(none specified)";

/// Values interpolated into every template.
struct Context<'a> {
    name: &'a str,
    kind: &'static str,
    features: String,
    tech: String,
    challenges: String,
    feature_list: String,
    challenge_list: String,
    criteria_list: String,
}

impl<'a> Context<'a> {
    fn new(analysis: &'a ProjectAnalysis) -> Self {
        Context {
            name: &analysis.project_name,
            kind: analysis.project_type.label(),
            features: inline(&analysis.main_features),
            tech: inline(&analysis.recommended_tech),
            challenges: inline(&analysis.technical_challenges),
            feature_list: bullets(&analysis.main_features),
            challenge_list: bullets(&analysis.technical_challenges),
            criteria_list: bullets(&analysis.success_criteria),
        }
    }
}

fn inline(items: &[String]) -> String {
    if items.is_empty() {
        NONE_SPECIFIED.to_string()
    } else {
        items.join(", ")
    }
}

fn bullets(items: &[String]) -> String {
    if items.is_empty() {
        NONE_SPECIFIED.to_string()
    } else {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn step(id: &str, title: &str, kind: StepKind, prompt: String) -> PlanStep {
    PlanStep {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        prompt,
    }
}

/// The four steps for the analysis' project type, in checklist order.
pub fn steps_for(analysis: &ProjectAnalysis) -> Vec<PlanStep> {
    let ctx = Context::new(analysis);
    match analysis.project_type {
        ProjectType::WebApp => web_app_steps(&ctx),
        ProjectType::Game => game_steps(&ctx),
        ProjectType::Tool => tool_steps(&ctx),
    }
}

// ─────────────────────────────────────────────
// Web application
// ─────────────────────────────────────────────

fn web_app_steps(c: &Context) -> Vec<PlanStep> {
    vec![
        step(
            "setup",
            "Project foundation",
            StepKind::Foundation,
            format!(
                "Create the \"{name}\" project with these requirements:\n\n\
                 Project type: {kind}\n\
                 Main features: {features}\n\
                 Recommended stack: {tech}\n\n\
                 Tasks:\n\
                 1. Create the complete project file structure\n\
                 2. Implement a responsive base layout\n\
                 3. Set up the styling framework\n\
                 4. Configure the base application architecture\n\
                 5. Keep the code structure clear and easy to extend\n\n\
                 Watch out for these technical challenges: {challenges}\n\n\
                 Output complete, runnable code.",
                name = c.name,
                kind = c.kind,
                features = c.features,
                tech = c.tech,
                challenges = c.challenges,
            ),
        ),
        step(
            "core",
            "Core features",
            StepKind::Feature,
            format!(
                "Now implement the core features of \"{name}\":\n\n\
                 Feature modules:\n{feature_list}\n\n\
                 Requirements:\n\
                 1. Implement all core business logic\n\
                 2. Add the necessary user interactions\n\
                 3. Make every feature stable and reliable\n\
                 4. Include proper error handling\n\
                 5. Comment the code well\n\n\
                 Technical notes:\n{challenge_list}\n\n\
                 Implement and test each module step by step.",
                name = c.name,
                feature_list = c.feature_list,
                challenge_list = c.challenge_list,
            ),
        ),
        step(
            "enhance",
            "User experience",
            StepKind::Enhancement,
            format!(
                "Improve the user experience of \"{name}\":\n\n\
                 Goals:\n\
                 1. Add smooth animations\n\
                 2. Make the layout responsive on every screen size\n\
                 3. Optimise performance and load time\n\
                 4. Add user feedback and hints\n\
                 5. Support accessibility\n\n\
                 Improvements:\n\
                 - Streamline the interaction flow\n\
                 - Add loading states and progress indicators\n\
                 - Persist data where needed\n\
                 - Add keyboard shortcuts\n\
                 - Polish the mobile experience\n\n\
                 Make sure none of this breaks existing features.",
                name = c.name,
            ),
        ),
        step(
            "finalize",
            "Polish and deployment",
            StepKind::Testing,
            format!(
                "Finish the \"{name}\" project:\n\n\
                 Final checklist:\n\
                 1. Test every feature end to end\n\
                 2. Fix any bugs found\n\
                 3. Optimise code performance\n\
                 4. Add complete documentation comments\n\
                 5. Check browser compatibility\n\
                 6. Prepare the deployment configuration\n\n\
                 Acceptance criteria:\n{criteria_list}\n\n\
                 Provide the final version and a deployment guide.",
                name = c.name,
                criteria_list = c.criteria_list,
            ),
        ),
    ]
}

// ─────────────────────────────────────────────
// Game
// ─────────────────────────────────────────────

fn game_steps(c: &Context) -> Vec<PlanStep> {
    vec![
        step(
            "game_foundation",
            "Game engine architecture",
            StepKind::Foundation,
            format!(
                "Create the \"{name}\" game project:\n\n\
                 Game type: {kind}\n\
                 Core gameplay: {features}\n\
                 Stack: {tech}\n\n\
                 Architecture:\n\
                 1. Set up the game loop and rendering\n\
                 2. Implement scene management\n\
                 3. Create the base game object types\n\
                 4. Set up input handling\n\
                 5. Add an asset manager\n\n\
                 Technical challenges: {challenges}\n\n\
                 Build an architecture that is easy to extend.",
                name = c.name,
                kind = c.kind,
                features = c.features,
                tech = c.tech,
                challenges = c.challenges,
            ),
        ),
        step(
            "game_mechanics",
            "Game mechanics",
            StepKind::Feature,
            format!(
                "Implement the core mechanics of \"{name}\":\n\n\
                 Core gameplay:\n{feature_list}\n\n\
                 Requirements:\n\
                 1. Game rules and logic\n\
                 2. Player controls\n\
                 3. Physics and collision detection\n\
                 4. Game state management\n\
                 5. Scoring and progression\n\n\
                 Notes:\n{challenge_list}\n\n\
                 Keep the mechanics balanced and fun.",
                name = c.name,
                feature_list = c.feature_list,
                challenge_list = c.challenge_list,
            ),
        ),
        step(
            "game_content",
            "Content and experience",
            StepKind::Enhancement,
            format!(
                "Add content to \"{name}\":\n\n\
                 Content:\n\
                 1. Sound effects and music\n\
                 2. Visual effects and animation\n\
                 3. Levels or content design\n\
                 4. UI improvements\n\
                 5. Difficulty balancing\n\n\
                 Experience:\n\
                 - Add a tutorial and help\n\
                 - Add settings\n\
                 - Optimise performance\n\
                 - Add achievements\n\
                 - Support different devices\n\n\
                 Make the game more engaging.",
                name = c.name,
            ),
        ),
        step(
            "game_polish",
            "Game polish",
            StepKind::Testing,
            format!(
                "Polish the \"{name}\" game:\n\n\
                 Tasks:\n\
                 1. Test every game feature\n\
                 2. Fix bugs and optimise performance\n\
                 3. Balance the difficulty\n\
                 4. Add save games\n\
                 5. Refine the user interface\n\n\
                 Acceptance criteria:\n{criteria_list}\n\n\
                 Make sure the game is stable and pleasant to play.",
                name = c.name,
                criteria_list = c.criteria_list,
            ),
        ),
    ]
}

// ─────────────────────────────────────────────
// Tool
// ─────────────────────────────────────────────

fn tool_steps(c: &Context) -> Vec<PlanStep> {
    vec![
        step(
            "tool_architecture",
            "Tool architecture",
            StepKind::Foundation,
            format!(
                "Create the \"{name}\" tool:\n\n\
                 Project type: {kind}\n\
                 Functions: {features}\n\
                 Stack: {tech}\n\n\
                 Architecture:\n\
                 1. Design a clear user interface\n\
                 2. Implement the data processing pipeline\n\
                 3. Structure the feature modules\n\
                 4. Add input validation\n\
                 5. Handle output formats\n\n\
                 Difficult parts: {challenges}\n\n\
                 Build a stable, reliable foundation.",
                name = c.name,
                kind = c.kind,
                features = c.features,
                tech = c.tech,
                challenges = c.challenges,
            ),
        ),
        step(
            "tool_functions",
            "Core functionality",
            StepKind::Feature,
            format!(
                "Build the core functionality of \"{name}\":\n\n\
                 Modules:\n{feature_list}\n\n\
                 Focus:\n\
                 1. Implement the main algorithms\n\
                 2. Accept the relevant input formats\n\
                 3. Keep results accurate\n\
                 4. Add error handling\n\
                 5. Optimise throughput\n\n\
                 Technical points:\n{challenge_list}\n\n\
                 Make sure the tool is accurate and dependable.",
                name = c.name,
                feature_list = c.feature_list,
                challenge_list = c.challenge_list,
            ),
        ),
        step(
            "tool_experience",
            "Usability",
            StepKind::Enhancement,
            format!(
                "Improve the usability of \"{name}\":\n\n\
                 Workflow:\n\
                 1. Simplify common operations\n\
                 2. Add usage guidance\n\
                 3. Support batch processing\n\
                 4. Support more formats\n\
                 5. Preview results\n\n\
                 Interface:\n\
                 - Clear status messages\n\
                 - Progress display\n\
                 - Shortcuts\n\
                 - Result export\n\
                 - History\n\n\
                 Make the tool easier and faster to use.",
                name = c.name,
            ),
        ),
        step(
            "tool_completion",
            "Tool completion",
            StepKind::Testing,
            format!(
                "Finish the \"{name}\" tool:\n\n\
                 Work items:\n\
                 1. Full functional testing\n\
                 2. Edge case handling\n\
                 3. Performance tuning\n\
                 4. User documentation\n\
                 5. Deployment preparation\n\n\
                 Quality bar:\n{criteria_list}\n\n\
                 Make sure the tool is stable, accurate, and easy to use.",
                name = c.name,
                criteria_list = c.criteria_list,
            ),
        ),
    ]
}
