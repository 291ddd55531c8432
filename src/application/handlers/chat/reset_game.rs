//! ResetGame command handler.

use std::time::Duration;
use tokio::time::sleep;

use super::TurnReply;
use crate::domain::game::replies::RESET_REPLY;

/// Answers a reset request after a short simulated pause.
#[derive(Debug, Clone)]
pub struct ResetGameHandler {
    delay: Duration,
}

impl ResetGameHandler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn handle(&self) -> TurnReply {
        tracing::info!(delay_ms = self.delay.as_millis() as u64, "Resetting game");
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        TurnReply {
            reply: RESET_REPLY.to_string(),
            reset: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reset_returns_fresh_start_reply() {
        let reply = ResetGameHandler::new(Duration::ZERO).handle().await;

        assert_eq!(reply.reply, RESET_REPLY);
        assert!(reply.reset);
        assert!(reply.error.is_none());
        assert!(reply.win.is_none());
    }

    #[tokio::test]
    async fn reset_waits_for_the_delay() {
        let handler = ResetGameHandler::new(Duration::from_millis(50));
        let started = tokio::time::Instant::now();

        handler.handle().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
