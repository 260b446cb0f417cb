//! Prompt text for the step executors.
//!
//! Wording is free to change; the system roles double as the keys a
//! scripted generator uses to route responses in tests.

use deckflow_protocols::Slide;

/// System role for strategy analysis.
pub const ANALYST_ROLE: &str = "You are a strategic advisor.";

/// System role for slide drafting.
pub const ARCHITECT_ROLE: &str = "You are a Presentation Expert. Output ONLY JSON.";

/// System role for the feedback-resolution audit.
pub const AUDITOR_ROLE: &str = "You are a harsh Audit Officer.";

/// Feedback text used in the draft prompt when none was given.
pub const NO_FEEDBACK: &str = "No feedback provided.";

pub fn analyze_prompt(user_request: &str, source_material: &str, feedback: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a Senior Strategy Consultant. Analyze the User Goal and File Data.\n\
         YOUR TASK:\n\
         1. Identify the Core Strategy.\n\
         2. GAPS: What is missing?\n\
         3. RECOMMENDATION: Propose a clear narrative arc.\n\n\
         USER GOAL: {user_request}\n\
         AVAILABLE FILE DATA:\n{source_material}\n"
    );
    if let Some(feedback) = feedback {
        prompt.push_str(&format!("\nREVIEWER FEEDBACK TO ADDRESS: {feedback}\n"));
    }
    prompt.push_str("\nKeep it concise.");
    prompt
}

pub fn draft_prompt(strategy_report: &str, feedback: Option<&str>) -> String {
    let feedback = feedback.unwrap_or(NO_FEEDBACK);
    format!(
        "Create a 3-slide presentation plan based on this report:\n{strategy_report}\n\n\
         USER FEEDBACK TO ADDRESS: {feedback}\n\n\
         CRITICAL: Return ONLY VALID JSON. Structure:\n\
         {{\n  \"design\": {{\"font_family\": \"Font\", \"title_color\": \"#RRGGBB\", \"accent_color\": \"#RRGGBB\"}},\n  \
         \"slides\": [\n    {{\"title\": \"Title\", \"bullets\": [\"Pt1\", \"Pt2\"], \"speaker_notes\": \"Script\"}}\n  ]\n}}"
    )
}

pub fn audit_prompt(feedback: &str, slides: &[Slide]) -> String {
    let slides = serde_json::to_string(slides).unwrap_or_else(|_| "[]".to_string());
    format!(
        "User Feedback: \"{feedback}\"\n\
         Proposed Slides: {slides}\n\n\
         Did the slides COMPLETELY solve the user's complaint?\n\
         If yes, say 'APPROVE'.\n\
         If no, say 'REJECT'."
    )
}
