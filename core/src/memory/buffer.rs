use crate::traits::{Memory, Role, Turn};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Log {
    turns: Vec<Turn>,
    next_seq: u64,
}

/// Append-only, unbounded in-process conversation log.
#[derive(Debug, Default)]
pub struct BufferMemory {
    log: Mutex<Log>,
}

impl BufferMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Memory for BufferMemory {
    fn name(&self) -> &str {
        "buffer"
    }

    async fn append(&self, role: Role, text: &str) -> anyhow::Result<Turn> {
        let mut log = self.log.lock().await;
        log.next_seq += 1;
        let turn = Turn {
            seq: log.next_seq,
            role,
            text: text.to_string(),
            at: chrono::Utc::now(),
        };
        log.turns.push(turn.clone());
        Ok(turn)
    }

    async fn turns(&self) -> anyhow::Result<Vec<Turn>> {
        Ok(self.log.lock().await.turns.clone())
    }

    async fn len(&self) -> anyhow::Result<usize> {
        Ok(self.log.lock().await.turns.len())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let mut log = self.log.lock().await;
        log.turns.clear();
        log.next_seq = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_insertion_order() {
        let memory = BufferMemory::new();
        memory.append(Role::User, "find red sneakers").await.unwrap();
        memory.append(Role::Assistant, "Here are three pairs").await.unwrap();
        memory.append(Role::User, "cheapest one?").await.unwrap();

        let turns = memory.turns().await.unwrap();
        let seqs: Vec<u64> = turns.iter().map(|t| t.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[2].text, "cheapest one?");
    }

    #[tokio::test]
    async fn keeps_duplicates() {
        let memory = BufferMemory::new();
        memory.append(Role::User, "hello").await.unwrap();
        memory.append(Role::User, "hello").await.unwrap();
        assert_eq!(memory.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn clear_resets_sequence() {
        let memory = BufferMemory::new();
        memory.append(Role::User, "one").await.unwrap();
        memory.append(Role::Assistant, "two").await.unwrap();
        memory.clear().await.unwrap();
        assert_eq!(memory.len().await.unwrap(), 0);

        let turn = memory.append(Role::User, "again").await.unwrap();
        assert_eq!(turn.seq, 1);
    }

    #[test]
    fn turn_converts_to_chat_message() {
        let turn = Turn {
            seq: 1,
            role: Role::Assistant,
            text: "Sure".into(),
            at: chrono::Utc::now(),
        };
        let msg = turn.to_message();
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content, "Sure");
    }
}
