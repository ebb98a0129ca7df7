use crate::types::ParsedAnalysis;

/// Start of the table header the analysis prompt asks the model to emit.
/// Its presence is the only check that the model followed the format.
pub const TABLE_HEADER_MARKER: &str = "| Timestamp Range | Metric |";

/// Classify a raw model response. The text is passed through unchanged when
/// the header marker appears anywhere in it; rows are never parsed.
pub fn extract(raw_text: &str) -> ParsedAnalysis {
    if raw_text.contains(TABLE_HEADER_MARKER) {
        ParsedAnalysis::MetricsFound {
            analysis: raw_text.to_string(),
        }
    } else {
        ParsedAnalysis::NoMetrics
    }
}

/// Split the name-extraction reply on commas. Entries keep surrounding
/// whitespace, so `"A, B"` yields `["A", " B"]`.
pub fn split_player_names(reply: &str) -> Vec<String> {
    reply.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "Here is what I found:\n\n\
        | Timestamp Range | Metric | Value | Identification Method | Play Analysis |\n\
        |---|---|---|---|---|\n\
        | 0:12-0:15 | Pitch Velocity | 97 mph | On-screen graphic | Fastball up and in |\n";

    #[test]
    fn text_without_marker_has_no_metrics() {
        assert_eq!(extract("no data here"), ParsedAnalysis::NoMetrics);
        assert_eq!(extract(""), ParsedAnalysis::NoMetrics);
    }

    #[test]
    fn marker_anywhere_passes_full_text_through() {
        match extract(TABLE) {
            ParsedAnalysis::MetricsFound { analysis } => assert_eq!(analysis, TABLE),
            other => panic!("expected metrics, got {other:?}"),
        }

        let bare = "prefix | Timestamp Range | Metric | suffix";
        assert!(extract(bare).metrics_found());
    }

    #[test]
    fn malformed_table_still_counts() {
        let broken = "| Timestamp Range | Metric |\nnot a table at all";
        assert!(extract(broken).metrics_found());
    }

    #[test]
    fn near_miss_marker_is_rejected() {
        // Different spacing or column order fails the literal match.
        assert!(!extract("|Timestamp Range|Metric|").metrics_found());
        assert!(!extract("| Metric | Timestamp Range |").metrics_found());
    }

    #[test]
    fn names_are_split_without_trimming() {
        assert_eq!(
            split_player_names("Shohei Ohtani, Mookie Betts,Freddie Freeman"),
            vec!["Shohei Ohtani", " Mookie Betts", "Freddie Freeman"]
        );
    }

    #[test]
    fn empty_reply_yields_one_empty_name() {
        assert_eq!(split_player_names(""), vec![String::new()]);
    }
}
