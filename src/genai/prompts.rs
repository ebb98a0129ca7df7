use crate::types::Language;

/// Instruction sent alongside the video. The table header here must stay in
/// sync with [`crate::extractor::TABLE_HEADER_MARKER`].
pub const VIDEO_ANALYSIS_PROMPT: &str = "\
You are a baseball analyst. Watch this game footage and extract these five Statcast metrics \
whenever they can be observed or inferred:
- Pitch Velocity: how hard, in miles per hour, a pitch is thrown.
- Exit Velocity: how fast, in miles per hour, a ball was hit by a batter.
- Spin Rate: how much spin, in revolutions per minute, a pitch was thrown with.
- Arm Angle: the angle, in degrees, of the pitcher's arm at release.
- Sprint Speed: a runner's top speed, in feet per second, in his fastest one-second window.

Report every observation as a row of a markdown table with exactly these columns:
| Timestamp Range | Metric | Value | Identification Method | Play Analysis |

Name the players involved in each play inside the Play Analysis column.
After the table, give a short summary of the key moments that a casual fan can follow, \
and suggest what to watch for in related footage.";

pub fn player_names_prompt(analysis: &str) -> String {
    format!(
        "List the full names of every baseball player mentioned in the analysis below. \
         Reply with only the names separated by commas, with no other text.\n\n{analysis}"
    )
}

pub fn translation_prompt(text: &str, language: Language) -> String {
    format!(
        "Translate the following text into {language}. Keep markdown tables, numbers and \
         player names intact. Reply with only the translation.\n\n{text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::TABLE_HEADER_MARKER;

    #[test]
    fn analysis_prompt_requests_the_detected_header() {
        assert!(VIDEO_ANALYSIS_PROMPT.contains(TABLE_HEADER_MARKER));
        assert!(VIDEO_ANALYSIS_PROMPT
            .contains("| Timestamp Range | Metric | Value | Identification Method | Play Analysis |"));
    }

    #[test]
    fn translation_prompt_names_the_language() {
        let p = translation_prompt("hello", Language::Hindi);
        assert!(p.contains("into Hindi"));
        assert!(p.ends_with("hello"));
    }
}
