// Shared prompt fragments and response clean-up.
// Each workflow that calls the LLM defines its own prompts.rs alongside it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex literal"));

/// Appended to prompts whose output is shown to the user verbatim.
pub const PLAIN_TEXT_INSTRUCTION: &str =
    "Respond in plain text. Do not use asterisks, markdown, or extra explanation.";

/// Removes the markdown emphasis the model emits despite being told not to.
pub fn strip_asterisks(text: &str) -> String {
    text.replace('*', "")
}

/// Fills `{name}` placeholders in a prompt template in a single pass.
/// Substituted values are never rescanned; unknown placeholders are left as is.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_asterisks() {
        assert_eq!(strip_asterisks("**Match Score: 7/10**"), "Match Score: 7/10");
    }

    #[test]
    fn test_fill_replaces_every_placeholder() {
        let out = fill("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y and x");
    }

    #[test]
    fn test_fill_keeps_braces_inside_values() {
        let out = fill(
            "JD:{job_description}\nSK:{skills}",
            &[("job_description", "we need {skills}"), ("skills", "rust")],
        );
        assert_eq!(out, "JD:we need {skills}\nSK:rust");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{a} {missing}", &[("a", "x")]), "x {missing}");
    }
}
