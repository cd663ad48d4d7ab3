/// Topics the full data panel listens on.
pub const KNOWN_TOPICS: [&str; 6] = [
    "llm-structured-output", // structured LLM responses
    "llm-transcription",     // plain LLM transcriptions
    "transcription",         // all transcriptions
    "interview-metrics",
    "interview-feedback",
    "interview-turn-data", // turn-by-turn data
];

/// The single topic used by the simple printer layout.
pub const SIMPLE_TOPIC: &str = "llm-structured-response";

/// Short label for a topic: the segment after the last `-`.
pub fn topic_label(topic: &str) -> &str {
    topic.rsplit('-').next().unwrap_or(topic)
}

pub fn default_topics() -> Vec<String> {
    KNOWN_TOPICS.iter().map(|topic| topic.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_last_segment() {
        assert_eq!(topic_label("interview-turn-data"), "data");
        assert_eq!(topic_label("llm-structured-output"), "output");
        assert_eq!(topic_label("transcription"), "transcription");
        assert_eq!(topic_label("trailing-"), "");
    }

    #[test]
    fn default_topics_match_known_list() {
        let topics = default_topics();
        assert_eq!(topics.len(), 6);
        assert_eq!(topics[4], "interview-feedback");
    }
}
