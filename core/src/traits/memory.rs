use crate::traits::ChatMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the conversation log. `seq` reflects insertion order, which
/// is conversational order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub seq: u64,
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn to_message(&self) -> ChatMessage {
        match self.role {
            Role::User => ChatMessage::user(self.text.clone()),
            Role::Assistant => ChatMessage::assistant(self.text.clone()),
        }
    }
}

#[async_trait]
pub trait Memory: Send + Sync {
    fn name(&self) -> &str;

    async fn append(&self, role: Role, text: &str) -> anyhow::Result<Turn>;

    /// All turns in insertion order.
    async fn turns(&self) -> anyhow::Result<Vec<Turn>>;

    async fn len(&self) -> anyhow::Result<usize>;

    async fn clear(&self) -> anyhow::Result<()>;
}
