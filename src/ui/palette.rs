use eframe::egui::Color32;

/// Colors used to tell topics apart: badge text, badge fill and border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicStyle {
    pub text: Color32,
    pub fill: Color32,
    pub stroke: Color32,
}

const fn style(text: (u8, u8, u8), fill: (u8, u8, u8), stroke: (u8, u8, u8)) -> TopicStyle {
    TopicStyle {
        text: Color32::from_rgb(text.0, text.1, text.2),
        // 20% / 30% alpha, premultiplied
        fill: Color32::from_rgba_premultiplied(fill.0, fill.1, fill.2, 51),
        stroke: Color32::from_rgba_premultiplied(stroke.0, stroke.1, stroke.2, 77),
    }
}

pub const BLUE: TopicStyle = style((96, 165, 250), (12, 26, 49), (18, 39, 74));
pub const GREEN: TopicStyle = style((74, 222, 128), (7, 39, 19), (10, 59, 28));
pub const PURPLE: TopicStyle = style((192, 132, 252), (34, 17, 49), (50, 26, 74));
pub const YELLOW: TopicStyle = style((250, 204, 21), (47, 36, 2), (70, 54, 2));
pub const PINK: TopicStyle = style((244, 114, 182), (47, 14, 31), (71, 22, 46));
pub const CYAN: TopicStyle = style((34, 211, 238), (1, 36, 42), (2, 55, 64));
pub const NEUTRAL: TopicStyle = style((156, 163, 175), (21, 23, 26), (32, 34, 38));

const TOPIC_STYLES: [(&str, TopicStyle); 6] = [
    ("llm-structured-output", BLUE),
    ("llm-transcription", GREEN),
    ("transcription", PURPLE),
    ("interview-metrics", YELLOW),
    ("interview-feedback", PINK),
    ("interview-turn-data", CYAN),
];

pub fn topic_style(topic: &str) -> TopicStyle {
    TOPIC_STYLES
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, style)| *style)
        .unwrap_or(NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::topics::KNOWN_TOPICS;

    #[test]
    fn feedback_topic_is_pink() {
        assert_eq!(topic_style("interview-feedback"), PINK);
    }

    #[test]
    fn every_known_topic_has_its_own_color() {
        let styles: Vec<_> = KNOWN_TOPICS.iter().map(|topic| topic_style(topic)).collect();
        for (i, style) in styles.iter().enumerate() {
            assert_ne!(*style, NEUTRAL);
            assert!(styles[i + 1..].iter().all(|other| other != style));
        }
    }

    #[test]
    fn unknown_topics_fall_back_to_neutral() {
        assert_eq!(topic_style("something-else"), NEUTRAL);
        assert_eq!(topic_style(""), NEUTRAL);
        assert_eq!(topic_style("llm-structured-response"), NEUTRAL);
    }
}
