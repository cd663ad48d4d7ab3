use crate::common::ReceivedMessage;

/// Whether the data panel is open or collapsed to its toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// What the message list shows when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// No message has arrived yet.
    Waiting { listening_on: usize },
    /// Messages exist but none on the selected topic.
    NoMatches { topic: String },
}

impl EmptyState {
    pub fn headline(&self) -> String {
        match self {
            EmptyState::Waiting { .. } => "Waiting for structured data...".to_string(),
            EmptyState::NoMatches { topic } => format!("No {topic} messages"),
        }
    }
}

/// Local UI state of the data panel.
pub struct PanelState {
    /// Every decoded message, in arrival order.
    pub messages: Vec<ReceivedMessage>,
    pub visibility: Visibility,
    /// Topic the list is narrowed to, if any.
    pub filter_topic: Option<String>,
    /// Number of topics the subscriber registered, for the empty state.
    pub listening_on: usize,
    scrolled_len: usize,
}

impl PanelState {
    pub fn new(listening_on: usize) -> Self {
        Self {
            messages: Vec::new(),
            visibility: Visibility::Visible,
            filter_topic: None,
            listening_on,
            scrolled_len: 0,
        }
    }

    pub fn push_message(&mut self, message: ReceivedMessage) {
        self.messages.push(message);
        log::debug!("Responses received: {}", self.messages.len());
    }

    /// Drops every message. Topic registrations are untouched.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.filter_topic = None;
    }

    pub fn latest_message(&self) -> Option<&ReceivedMessage> {
        self.messages.last()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn show(&mut self) {
        self.visibility = Visibility::Visible;
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
    }

    /// Selects `topic`, or clears the filter if it is already selected.
    pub fn toggle_filter(&mut self, topic: &str) {
        if self.filter_topic.as_deref() == Some(topic) {
            self.filter_topic = None;
        } else {
            self.filter_topic = Some(topic.to_string());
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter_topic = None;
    }

    pub fn filtered_messages(&self) -> Vec<&ReceivedMessage> {
        match &self.filter_topic {
            Some(topic) => self
                .messages
                .iter()
                .filter(|message| &message.topic == topic)
                .collect(),
            None => self.messages.iter().collect(),
        }
    }

    /// Filtered messages paired with their 1-based ordinal; the newest is highest.
    pub fn numbered_messages(&self) -> Vec<(usize, &ReceivedMessage)> {
        self.filtered_messages()
            .into_iter()
            .enumerate()
            .map(|(index, message)| (index + 1, message))
            .collect()
    }

    /// Only meaningful while the filtered list is empty.
    pub fn empty_state(&self) -> EmptyState {
        match (&self.filter_topic, self.messages.is_empty()) {
            (Some(topic), false) => EmptyState::NoMatches {
                topic: topic.clone(),
            },
            _ => EmptyState::Waiting {
                listening_on: self.listening_on,
            },
        }
    }

    /// The filter bar is shown once messages from two topics have arrived.
    pub fn shows_filter_bar(&self) -> bool {
        match self.messages.first() {
            Some(first) => self.messages.iter().any(|m| m.topic != first.topic),
            None => false,
        }
    }

    /// Count shown on the reopen button, if any.
    pub fn badge_count(&self) -> Option<usize> {
        match self.messages.len() {
            0 => None,
            count => Some(count),
        }
    }

    /// Footer line, given how many messages the filtered view holds.
    pub fn footer_text(&self, shown: usize) -> Option<String> {
        let total = self.messages.len();
        if total == 0 {
            return None;
        }
        Some(match self.filter_topic {
            Some(_) => format!("Total responses: {total} ({shown} filtered)"),
            None => format!("Total responses: {total}"),
        })
    }

    /// Distinct topics seen so far, in order of first appearance, with counts.
    pub fn distinct_topics(&self) -> Vec<(String, usize)> {
        let mut topics: Vec<(String, usize)> = Vec::new();
        for message in &self.messages {
            match topics.iter_mut().find(|(topic, _)| *topic == message.topic) {
                Some((_, count)) => *count += 1,
                None => topics.push((message.topic.clone(), 1)),
            }
        }
        topics
    }

    /// True once per change in message count; the list then jumps to the bottom.
    pub fn take_scroll_request(&mut self) -> bool {
        let changed = self.scrolled_len != self.messages.len();
        self.scrolled_len = self.messages.len();
        changed
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;

    fn message(topic: &str, n: i64) -> ReceivedMessage {
        let mut payload = Map::new();
        payload.insert("n".into(), json!(n));
        ReceivedMessage::new(topic, "agent", payload)
    }

    fn numbers(messages: &[&ReceivedMessage]) -> Vec<Value> {
        messages.iter().map(|m| m.payload["n"].clone()).collect()
    }

    fn state_with(topics: &[&str]) -> PanelState {
        let mut state = PanelState::new(6);
        for (n, topic) in topics.iter().enumerate() {
            state.push_message(message(topic, n as i64));
        }
        state
    }

    #[test]
    fn starts_visible_and_empty() {
        let state = PanelState::new(6);
        assert!(state.is_visible());
        assert!(state.messages.is_empty());
        assert!(state.latest_message().is_none());
    }

    #[test]
    fn visibility_toggles_both_ways() {
        let mut state = PanelState::new(6);
        state.hide();
        assert_eq!(state.visibility, Visibility::Hidden);
        state.show();
        assert_eq!(state.visibility, Visibility::Visible);
    }

    #[test]
    fn filter_yields_ordered_subsequence() {
        let mut state = state_with(&["a", "b", "a", "c", "a"]);
        state.toggle_filter("a");
        assert_eq!(numbers(&state.filtered_messages()), vec![json!(0), json!(2), json!(4)]);
        state.toggle_filter("c");
        assert_eq!(numbers(&state.filtered_messages()), vec![json!(3)]);
    }

    #[test]
    fn reselecting_active_topic_clears_filter() {
        let mut state = state_with(&["a", "b"]);
        state.toggle_filter("a");
        assert_eq!(state.filtered_messages().len(), 1);
        state.toggle_filter("a");
        assert_eq!(state.filter_topic, None);
        assert_eq!(state.filtered_messages().len(), 2);
    }

    #[test]
    fn two_topics_filter_to_one_each() {
        let mut state = state_with(&["A", "B"]);
        assert_eq!(numbers(&state.filtered_messages()), vec![json!(0), json!(1)]);
        state.toggle_filter("A");
        assert_eq!(state.filtered_messages().len(), 1);
        state.toggle_filter("B");
        assert_eq!(state.filtered_messages().len(), 1);
        state.clear_filter();
        assert_eq!(state.filtered_messages().len(), 2);
    }

    #[test]
    fn filter_on_unseen_topic_is_empty() {
        let mut state = state_with(&["a"]);
        state.toggle_filter("zzz");
        assert!(state.filtered_messages().is_empty());
    }

    #[test]
    fn distinct_topics_keep_first_appearance_order() {
        let state = state_with(&["b", "a", "b", "b"]);
        assert_eq!(
            state.distinct_topics(),
            vec![("b".to_string(), 3), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn clear_resets_counts_and_filter() {
        let mut state = state_with(&["a", "b", "c"]);
        state.toggle_filter("b");
        state.clear_messages();
        assert!(state.messages.is_empty());
        assert!(state.distinct_topics().is_empty());
        assert_eq!(state.filter_topic, None);

        state.push_message(message("d", 9));
        assert_eq!(state.filtered_messages().len(), 1);
        assert_eq!(state.latest_message().map(|m| m.topic.as_str()), Some("d"));
    }

    #[test]
    fn ordinals_count_up_to_newest_within_filter() {
        let mut state = state_with(&["a", "b", "a", "a"]);
        let ordinals: Vec<_> = state.numbered_messages().iter().map(|(n, _)| *n).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);

        state.toggle_filter("a");
        let numbered = state.numbered_messages();
        let pairs: Vec<_> = numbered.iter().map(|(n, m)| (*n, m.payload["n"].clone())).collect();
        assert_eq!(pairs, vec![(1, json!(0)), (2, json!(2)), (3, json!(3))]);
    }

    #[test]
    fn empty_state_tells_waiting_from_no_matches() {
        let mut state = PanelState::new(6);
        assert_eq!(state.empty_state(), EmptyState::Waiting { listening_on: 6 });
        assert_eq!(state.empty_state().headline(), "Waiting for structured data...");

        state.push_message(message("transcription", 1));
        state.toggle_filter("interview-feedback");
        assert!(state.numbered_messages().is_empty());
        assert_eq!(
            state.empty_state().headline(),
            "No interview-feedback messages"
        );
    }

    #[test]
    fn filter_bar_needs_two_distinct_topics() {
        let mut state = PanelState::new(6);
        assert!(!state.shows_filter_bar());
        state.push_message(message("a", 1));
        state.push_message(message("a", 2));
        assert!(!state.shows_filter_bar());
        assert_eq!(state.distinct_topics().len(), 1);

        state.push_message(message("b", 3));
        assert!(state.shows_filter_bar());
        assert_eq!(state.distinct_topics().len(), 2);
    }

    #[test]
    fn badge_only_counts_above_zero() {
        let mut state = PanelState::new(6);
        assert_eq!(state.badge_count(), None);
        state.push_message(message("a", 1));
        state.push_message(message("b", 2));
        assert_eq!(state.badge_count(), Some(2));
        state.clear_messages();
        assert_eq!(state.badge_count(), None);
    }

    #[test]
    fn footer_mentions_filtered_count_only_when_filtering() {
        let mut state = PanelState::new(6);
        assert_eq!(state.footer_text(0), None);

        state = state_with(&["a", "b", "a"]);
        assert_eq!(state.footer_text(3).as_deref(), Some("Total responses: 3"));
        state.toggle_filter("a");
        let shown = state.numbered_messages().len();
        assert_eq!(
            state.footer_text(shown).as_deref(),
            Some("Total responses: 3 (2 filtered)")
        );
    }

    #[test]
    fn scroll_requested_once_per_count_change() {
        let mut state = PanelState::new(6);
        assert!(!state.take_scroll_request());
        state.push_message(message("a", 1));
        assert!(state.take_scroll_request());
        assert!(!state.take_scroll_request());
        state.clear_messages();
        assert!(state.take_scroll_request());
    }
}
