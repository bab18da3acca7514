//! The conversation history of a chat session.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// Text typed by the person chatting.
    User,
    /// Text produced by the model.
    Assistant,
}

impl Role {
    /// Returns the lowercase name of this role.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Role`] from an unknown name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl Display for UnknownRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

/// One role-tagged message in the conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    /// Creates a new turn.
    #[inline]
    pub fn new<S: Into<String>>(role: Role, text: S) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Returns the author of this turn.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this turn.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The ordered, append-only history of turns for one session.
///
/// Turns are never reordered, edited or removed. Starting over means
/// replacing the whole transcript with a fresh one.
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Appends a turn at the end of the transcript.
    #[inline]
    pub fn append<S: Into<String>>(&mut self, role: Role, text: S) {
        self.turns.push(Turn::new(role, text));
    }

    /// Returns the full history in submission order.
    #[inline]
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the most recent turn.
    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns whether no turn has been appended yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut transcript = Transcript::default();
        assert!(transcript.is_empty());
        transcript.append(Role::User, "first");
        transcript.append(Role::Assistant, "second");
        transcript.append(Role::User, "third");

        let texts: Vec<_> = transcript.all().iter().map(Turn::text).collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last(), Some(&Turn::new(Role::User, "third")));
    }

    #[test]
    fn test_role_names() {
        for role in [Role::System, Role::User, Role::Assistant] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "ai".parse::<Role>(),
            Err(UnknownRole("ai".to_owned()))
        );
    }

    #[test]
    fn test_serialize_transcript() {
        let mut transcript = Transcript::default();
        transcript.append(Role::User, "Hi");
        let value = serde_json::to_value(&transcript).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "turns": [{ "role": "user", "text": "Hi" }] })
        );
    }
}
