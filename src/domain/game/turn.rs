//! Conversation turns supplied by the caller.

use serde::{Deserialize, Serialize};

/// Who spoke a turn.
///
/// Serialized lowercase. Any incoming role other than `user` (clients send
/// `ai`, `system`, ...) is read as `Assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<String> for TurnRole {
    fn from(role: String) -> Self {
        if role == "user" {
            Self::User
        } else {
            Self::Assistant
        }
    }
}

/// One message of the conversation history.
///
/// History order matters: recency windows are taken from the tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_lowercase_roles() {
        let turn: Turn = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(turn, Turn::assistant("hi"));
    }

    #[test]
    fn non_user_roles_read_as_assistant() {
        for role in ["ai", "system", "narrator", "USER"] {
            let json = format!(r#"{{"role":"{}","content":"hi"}}"#, role);
            let turn: Turn = serde_json::from_str(&json).unwrap();
            assert_eq!(turn.role, TurnRole::Assistant, "role {:?}", role);
        }
    }

    #[test]
    fn user_role_reads_as_user() {
        let turn: Turn = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert!(turn.is_user());
    }

    #[test]
    fn serializes_lowercase_roles() {
        let json = serde_json::to_value(Turn::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
