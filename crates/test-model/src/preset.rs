use devmind_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
}

/// The error kind a failing preset reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    MissingCredential,
    Unauthorized,
    RateLimitExceeded,
    Other,
}

impl From<PresetFailure> for ErrorKind {
    fn from(value: PresetFailure) -> Self {
        match value {
            PresetFailure::MissingCredential => ErrorKind::MissingCredential,
            PresetFailure::Unauthorized => ErrorKind::Unauthorized,
            PresetFailure::RateLimitExceeded => ErrorKind::RateLimitExceeded,
            PresetFailure::Other => ErrorKind::Other,
        }
    }
}

/// The preset response for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
    /// The kind of error reported by failed attempts.
    #[serde(default = "default_failure")]
    pub failure: PresetFailure,
    /// If set, the response finishes as cut off by the token limit.
    #[serde(default)]
    pub truncated: bool,
}

fn default_failure() -> PresetFailure {
    PresetFailure::Other
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failures: None,
            failure: default_failure(),
            truncated: false,
        }
    }

    /// Creates a `PresetResponse` that streams `text` as one delta per
    /// whitespace-separated word.
    pub fn with_text(text: &str) -> Self {
        let mut events = Vec::new();
        let mut rest = text;
        while let Some(idx) = rest.find(' ') {
            events.push(PresetEvent::MessageDelta(rest[..=idx].to_owned()));
            rest = &rest[idx + 1..];
        }
        if !rest.is_empty() {
            events.push(PresetEvent::MessageDelta(rest.to_owned()));
        }
        Self::with_events(events)
    }

    /// Marks the response as cut off by the token limit.
    #[inline]
    pub fn with_truncation(mut self) -> Self {
        self.truncated = true;
        self
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64, kind: PresetFailure) -> Self {
        self.failures = Some(failures);
        self.failure = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_script_entry() {
        let value = json!({
            "events": [
                { "type": "message_delta", "data": "<think>hmm</think>" },
                { "type": "message_delta", "data": "Done." }
            ],
            "failures": 2,
            "failure": "rate_limit_exceeded"
        });
        let response: PresetResponse = serde_json::from_value(value).unwrap();
        assert_eq!(
            response,
            PresetResponse::with_events([
                PresetEvent::MessageDelta("<think>hmm</think>".to_owned()),
                PresetEvent::MessageDelta("Done.".to_owned()),
            ])
            .with_failures(2, PresetFailure::RateLimitExceeded)
        );
    }

    #[test]
    fn test_with_text_keeps_spacing() {
        let response = PresetResponse::with_text("a  b c");
        let joined: String = response
            .events
            .iter()
            .map(|PresetEvent::MessageDelta(delta)| delta.as_str())
            .collect();
        assert_eq!(joined, "a  b c");
        assert_eq!(response.events.len(), 4);
    }
}
