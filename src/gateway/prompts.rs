use std::fmt;

const QUICK_PROMPT: &str =
    "Describe this image in one clear, concise sentence. Focus on the main subject.";

const DETAILED_PROMPT: &str = "\
Provide a detailed, accessible description of this image for someone who cannot see it. Include:
1. Main subject and what's happening
2. Colors, shapes, and visual elements
3. Text visible in the image (if any)
4. Spatial relationships (left, right, foreground, background)
5. Emotional tone or mood
Be thorough but organized. Use clear, descriptive language.";

const NAVIGATION_PROMPT: &str = "\
Describe this image as if helping a blind person navigate or understand a physical space or document. Include:
1. Layout and structure
2. Any text, signs, or labels
3. Important objects and their positions
4. Potential hazards or obstacles (if applicable)
5. Key information for practical use";

const DEAFBLIND_PROMPT: &str = "\
Describe this image in a simple, structured format for someone who is deafblind:
SUBJECT: [main subject in 5 words or less]
DESCRIPTION: [clear, simple description in 2-3 sentences]
TEXT: [any text visible, or \"none\"]
KEY DETAILS: [bullet points of important elements]";

pub const EXTRACTION_PROMPT: &str = "Extract all text from this document. Preserve the structure and formatting as much as possible. If it's an image, describe any visual elements along with the text.";

const SIMPLIFY_PREAMBLE: &str = "\
Simplify the following text for someone who is deafblind. Use:
- Short, clear sentences
- Simple vocabulary
- Structured format with clear sections
- No idioms or complex metaphors

Text to simplify:
";

/// Prompt template selector for image descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescribeMode {
    Quick,
    Detailed,
    Navigation,
    Deafblind,
}

impl DescribeMode {
    pub const ALL: [Self; 4] = [Self::Quick, Self::Detailed, Self::Navigation, Self::Deafblind];

    /// An absent mode means `detailed`. Any value outside the four known
    /// names lands on the deafblind template.
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            None => Self::Detailed,
            Some("quick") => Self::Quick,
            Some("detailed") => Self::Detailed,
            Some("navigation") => Self::Navigation,
            Some(_) => Self::Deafblind,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Detailed => "detailed",
            Self::Navigation => "navigation",
            Self::Deafblind => "deafblind",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Self::Quick => QUICK_PROMPT,
            Self::Detailed => DETAILED_PROMPT,
            Self::Navigation => NAVIGATION_PROMPT,
            Self::Deafblind => DEAFBLIND_PROMPT,
        }
    }
}

impl fmt::Display for DescribeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn simplify_prompt(text: &str) -> String {
    format!("{SIMPLIFY_PREAMBLE}{text}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_mode_has_a_distinct_non_empty_prompt() {
        let prompts = DescribeMode::ALL
            .iter()
            .map(|mode| mode.prompt())
            .collect::<HashSet<_>>();
        assert_eq!(prompts.len(), DescribeMode::ALL.len());
        assert!(prompts.iter().all(|prompt| !prompt.trim().is_empty()));
    }

    #[test]
    fn known_modes_round_trip_through_request_names() {
        for mode in DescribeMode::ALL {
            assert_eq!(DescribeMode::from_request(Some(mode.as_str())), mode);
        }
    }

    #[test]
    fn missing_mode_defaults_to_detailed() {
        assert_eq!(DescribeMode::from_request(None), DescribeMode::Detailed);
    }

    #[test]
    fn unrecognized_mode_falls_back_to_deafblind() {
        for raw in ["", "DETAILED", "verbose", "quick "] {
            assert_eq!(
                DescribeMode::from_request(Some(raw)),
                DescribeMode::Deafblind,
                "mode {raw:?} should fall back to deafblind"
            );
        }
    }

    #[test]
    fn simplify_prompt_appends_the_source_text() {
        let prompt = simplify_prompt("The meeting is postponed.");
        assert!(prompt.starts_with("Simplify the following text"));
        assert!(prompt.ends_with("Text to simplify:\nThe meeting is postponed."));
    }
}
