//! # Chat Session
//!
//! Wraps a [`ChatTranscript`] with the timers that make the agent feel live.
//!
//! ## Timers
//! ```text
//! send("Hi") ─► post_user (Sending, typing on) ─► generation += 1
//!     │
//!     ├── spawn: sleep(chat_delivery)  ─► mark_delivered(id)
//!     │
//!     └── spawn: sleep(min..=max)      ─► generation unchanged?
//!                                            yes ─► post_agent_reply(canned)
//!                                            no  ─► drop (a newer message
//!                                                   gets the answer)
//! ```
//!
//! Only the latest shopper message is answered. Nothing is posted once the
//! chat has ended.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, warn};
use vitrine_core::chat::{ChatMessage, ChatTranscript, CANNED_RESPONSES};
use vitrine_core::CoreResult;

use crate::config::SimulatedDelays;

#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Arc<Mutex<ChatTranscript>>,
    /// Bumped on every shopper message; a reply task only posts if the
    /// value it captured is still current.
    generation: Arc<AtomicU64>,
    delays: SimulatedDelays,
}

fn lock(transcript: &Mutex<ChatTranscript>) -> MutexGuard<'_, ChatTranscript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatSession {
    pub fn new(transcript: ChatTranscript, delays: SimulatedDelays) -> Self {
        Self {
            transcript: Arc::new(Mutex::new(transcript)),
            generation: Arc::new(AtomicU64::new(0)),
            delays,
        }
    }

    /// The demo conversation, connected to the first agent.
    pub fn sample(delays: SimulatedDelays) -> Self {
        Self::new(ChatTranscript::sample(Utc::now()), delays)
    }

    pub fn snapshot(&self) -> ChatTranscript {
        lock(&self.transcript).clone()
    }

    pub fn open(&self) -> ChatTranscript {
        let mut transcript = lock(&self.transcript);
        transcript.open();
        transcript.clone()
    }

    pub fn close(&self) -> ChatTranscript {
        let mut transcript = lock(&self.transcript);
        transcript.close();
        transcript.clone()
    }

    /// Posts a shopper message and schedules its delivery receipt and the
    /// agent's reply. Must be called inside a tokio runtime.
    pub fn send(&self, content: &str) -> CoreResult<ChatMessage> {
        let message = lock(&self.transcript).post_user(content, Utc::now())?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (reply_delay, reply) = {
            let mut rng = rand::rng();
            let min = self.delays.chat_reply_min.as_millis() as u64;
            let max = (self.delays.chat_reply_max.as_millis() as u64).max(min);
            let delay = Duration::from_millis(rng.random_range(min..=max));
            let reply = CANNED_RESPONSES[rng.random_range(0..CANNED_RESPONSES.len())];
            (delay, reply)
        };

        debug!(
            message_id = %message.id,
            generation,
            reply_in_ms = reply_delay.as_millis() as u64,
            "Chat message queued"
        );

        let transcript = self.transcript.clone();
        let message_id = message.id.clone();
        let delivery_delay = self.delays.chat_delivery;
        tokio::spawn(async move {
            tokio::time::sleep(delivery_delay).await;
            lock(&transcript).mark_delivered(&message_id);
        });

        let transcript = self.transcript.clone();
        let current = self.generation.clone();
        tokio::spawn(async move {
            tokio::time::sleep(reply_delay).await;
            if current.load(Ordering::SeqCst) != generation {
                debug!(generation, "Reply superseded by a newer message");
                return;
            }
            if let Err(e) = lock(&transcript).post_agent_reply(reply, Utc::now()) {
                debug!(error = %e, "Agent reply dropped");
            }
        });

        Ok(message)
    }

    pub fn select_agent(&self, agent_id: &str) -> CoreResult<ChatMessage> {
        lock(&self.transcript).select_agent(agent_id, Utc::now())
    }

    /// Ends the chat. Pending replies are discarded.
    pub fn end(&self) -> ChatTranscript {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut transcript = lock(&self.transcript);
        transcript.end(Utc::now());
        transcript.clone()
    }

    pub fn rate(&self, rating: u8) -> CoreResult<()> {
        let result = lock(&self.transcript).rate(rating);
        if let Err(e) = &result {
            warn!(error = %e, rating, "Chat rating rejected");
        }
        result
    }
}
