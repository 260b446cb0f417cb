//! Slide plan extraction from model output.

use deckflow_protocols::SlidePlan;

const FENCE: &str = "```";

/// Extract the JSON payload from a response that may wrap it in prose or
/// markdown code fences.
///
/// A fenced block anywhere in the text wins; otherwise the span from the
/// first `{` to the last `}` is used. Falls back to the trimmed input.
pub fn extract_plan_payload(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(open) = trimmed.find(FENCE) {
        let after_open = &trimmed[open + FENCE.len()..];
        // Skip the info string (e.g. `json`) on the opening fence line.
        if let Some(line_end) = after_open.find('\n') {
            let body = &after_open[line_end + 1..];
            if let Some(close) = body.find(FENCE) {
                return body[..close].trim();
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Extract and parse a slide plan.
pub fn parse_slide_plan(response: &str) -> Result<SlidePlan, serde_json::Error> {
    serde_json::from_str(extract_plan_payload(response))
}
