//! Human-readable rendering of an inferred format.

use crate::analysis::InputFormat;

/// Shown when analysis found nothing to describe.
pub const NO_FORMAT_HINT: &str = "No specific input format detected. You can enter any input.";

/// Render one `Line N: ...` entry per requirement, in order.
pub fn generate_input_hints(format: &InputFormat) -> String {
    if format.requirements.is_empty() {
        return NO_FORMAT_HINT.to_string();
    }

    format
        .requirements
        .iter()
        .enumerate()
        .map(|(index, req)| {
            let suffix = if req.is_array { " (space-separated)" } else { "" };
            format!("Line {}: {}{}", index + 1, req.description, suffix)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
