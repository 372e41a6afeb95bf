//! # Live Chat Transcript
//!
//! The state of one support chat. Timing (delivery receipts, the agent's
//! typing delay) lives in `vitrine-session`; this module only records what
//! happened.
//!
//! ## Message Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  post_user("Hi")                                                        │
//! │     │  status = Sending, agent typing = true                            │
//! │     ├──────────────► mark_delivered(id)   (after delivery delay)        │
//! │     │                status = Delivered                                 │
//! │     └──────────────► post_agent_reply()   (after reply delay)           │
//! │                      typing = false, unread += 1 if widget closed       │
//! │                                                                         │
//! │  Chat status:   Connected ──end()──► Ended ──rate(1..=5)                │
//! │                    ▲                                                    │
//! │  Waiting ──select_agent()                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::{validate_max_length, validate_rating, MAX_TEXT_LENGTH};

// =============================================================================
// Static Data
// =============================================================================

/// One-tap messages offered under the input box.
pub const QUICK_REPLIES: [&str; 6] = [
    "I need help with my order",
    "Product information",
    "Technical support",
    "Return/Exchange",
    "Shipping questions",
    "AR viewing issues",
];

/// What an agent says back to a shopper message.
pub const CANNED_RESPONSES: [&str; 4] = [
    "I understand your concern. Let me check that for you right away.",
    "That's a great question! I have the information you need.",
    "I'd be happy to help you with that. Let me get the details.",
    "Perfect! I can definitely assist you with this.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Online,
    Busy,
    Away,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChatAgent {
    pub id: String,
    pub name: String,
    pub role: String,
    pub status: AgentStatus,
    pub rating: f32,
    pub specialties: Vec<String>,
    pub response_time: String,
}

fn agent(
    id: &str,
    name: &str,
    role: &str,
    status: AgentStatus,
    rating: f32,
    specialties: [&str; 3],
    response_time: &str,
) -> ChatAgent {
    ChatAgent {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        status,
        rating,
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        response_time: response_time.to_string(),
    }
}

/// The support roster.
pub fn agents() -> Vec<ChatAgent> {
    vec![
        agent(
            "1",
            "Sarah Johnson",
            "Senior Support Specialist",
            AgentStatus::Online,
            4.9,
            ["Product Questions", "Technical Support", "Returns"],
            "< 1 min",
        ),
        agent(
            "2",
            "Mike Chen",
            "Sales Consultant",
            AgentStatus::Online,
            4.8,
            ["Product Recommendations", "Pricing", "Customization"],
            "< 2 min",
        ),
        agent(
            "3",
            "Emma Rodriguez",
            "Technical Expert",
            AgentStatus::Busy,
            5.0,
            ["AR Support", "3D Viewing", "Device Compatibility"],
            "< 5 min",
        ),
    ]
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Agent,
    Bot,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Read,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
    pub agent: Option<AgentInfo>,
}

impl ChatMessage {
    fn new(
        content: impl Into<String>,
        sender: Sender,
        status: MessageStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: now,
            status,
            agent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    Waiting,
    Connected,
    Ended,
}

// =============================================================================
// Transcript
// =============================================================================

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
    pub current_agent: Option<ChatAgent>,
    pub status: ChatStatus,
    /// Agent messages received while the widget was closed.
    pub unread_count: u32,
    pub is_open: bool,
    pub agent_typing: bool,
    pub satisfaction: Option<u8>,
}

impl ChatTranscript {
    /// A chat with no agent yet.
    pub fn waiting() -> Self {
        Self {
            messages: Vec::new(),
            current_agent: None,
            status: ChatStatus::Waiting,
            unread_count: 0,
            is_open: false,
            agent_typing: false,
            satisfaction: None,
        }
    }

    /// The demo conversation every session starts with: already connected
    /// to the first agent, four messages of history.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let roster = agents();
        let sarah = roster.into_iter().next();
        let ago = |secs| now - Duration::seconds(secs);

        let mut history = vec![
            ChatMessage::new(
                "Hello! Welcome to Premium 3D E-commerce. How can I help you today?",
                Sender::Bot,
                MessageStatus::Read,
                ago(300),
            ),
            ChatMessage::new(
                "Hi! I'm interested in the Crystal Dragon Figurine but I'm not sure about the \
                 size. Can you help?",
                Sender::User,
                MessageStatus::Read,
                ago(240),
            ),
            ChatMessage::new(
                "I'd be happy to help! Let me connect you with Sarah, our product specialist \
                 who can provide detailed information about the Crystal Dragon Figurine.",
                Sender::Bot,
                MessageStatus::Read,
                ago(180),
            ),
        ];
        let mut intro = ChatMessage::new(
            "Hi there! I'm Sarah, and I'd love to help you with the Crystal Dragon Figurine. \
             It's 8 inches tall and 6 inches wide, perfect for display. Would you like to see \
             it in AR to get a better sense of the size?",
            Sender::Agent,
            MessageStatus::Read,
            ago(120),
        );
        intro.agent = sarah.as_ref().map(|a| AgentInfo {
            name: a.name.clone(),
            role: a.role.clone(),
        });
        history.push(intro);

        Self {
            messages: history,
            current_agent: sarah,
            status: ChatStatus::Connected,
            ..Self::waiting()
        }
    }

    fn push(&mut self, message: ChatMessage) {
        if !self.is_open && message.sender != Sender::User {
            self.unread_count += 1;
        }
        self.messages.push(message);
    }

    fn ensure_active(&self) -> CoreResult<()> {
        if self.status == ChatStatus::Ended {
            return Err(CoreError::ChatEnded);
        }
        Ok(())
    }

    fn agent_info(&self) -> Option<AgentInfo> {
        self.current_agent.as_ref().map(|a| AgentInfo {
            name: a.name.clone(),
            role: a.role.clone(),
        })
    }

    /// Opening the widget clears the unread badge.
    pub fn open(&mut self) {
        self.is_open = true;
        self.unread_count = 0;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Records a shopper message in `Sending` state and marks the agent as
    /// typing. Blank messages are rejected.
    pub fn post_user(&mut self, content: &str, now: DateTime<Utc>) -> CoreResult<ChatMessage> {
        self.ensure_active()?;
        if content.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "message".to_string(),
            }
            .into());
        }
        validate_max_length("message", content, MAX_TEXT_LENGTH)?;

        let message = ChatMessage::new(content, Sender::User, MessageStatus::Sending, now);
        self.push(message.clone());
        self.agent_typing = true;
        Ok(message)
    }

    /// Flips a shopper message to `Delivered`. Unknown ids are ignored.
    pub fn mark_delivered(&mut self, message_id: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                message.status = MessageStatus::Delivered;
                true
            }
            None => false,
        }
    }

    /// Posts the agent's answer to the latest shopper message.
    pub fn post_agent_reply(
        &mut self,
        content: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<ChatMessage> {
        self.agent_typing = false;
        self.ensure_active()?;

        let mut message = ChatMessage::new(content, Sender::Agent, MessageStatus::Sent, now);
        message.agent = self.agent_info();
        self.push(message.clone());
        Ok(message)
    }

    /// Hands the chat to another agent, who introduces themselves.
    pub fn select_agent(&mut self, agent_id: &str, now: DateTime<Utc>) -> CoreResult<ChatMessage> {
        self.ensure_active()?;
        let agent = agents()
            .into_iter()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| CoreError::AgentNotFound(agent_id.to_string()))?;

        let mut message = ChatMessage::new(
            format!(
                "You're now connected with {}, {}. How can I help you today?",
                agent.name, agent.role
            ),
            Sender::Agent,
            MessageStatus::Sent,
            now,
        );
        self.current_agent = Some(agent);
        self.status = ChatStatus::Connected;
        message.agent = self.agent_info();
        self.push(message.clone());
        Ok(message)
    }

    /// Ends the chat. Ending twice is a no-op.
    pub fn end(&mut self, now: DateTime<Utc>) {
        if self.status == ChatStatus::Ended {
            return;
        }
        self.status = ChatStatus::Ended;
        self.agent_typing = false;
        self.push(ChatMessage::new(
            "Chat session ended. Thank you for contacting us! Please rate your experience.",
            Sender::System,
            MessageStatus::Sent,
            now,
        ));
    }

    /// Records satisfaction, 1-5, once the chat has ended.
    pub fn rate(&mut self, rating: u8) -> CoreResult<()> {
        if self.status != ChatStatus::Ended {
            return Err(CoreError::ChatStillActive);
        }
        validate_rating("rating", rating)?;
        self.satisfaction = Some(rating);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_connected_to_first_agent() {
        let chat = ChatTranscript::sample(Utc::now());
        assert_eq!(chat.status, ChatStatus::Connected);
        assert_eq!(chat.current_agent.as_ref().unwrap().name, "Sarah Johnson");
        assert_eq!(chat.messages.len(), 4);
        assert_eq!(chat.unread_count, 0);
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut chat = ChatTranscript::sample(Utc::now());
        let err = chat.post_user("   ", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
        assert_eq!(chat.messages.len(), 4);
        assert!(!chat.agent_typing);
    }

    #[test]
    fn test_user_message_flow() {
        let now = Utc::now();
        let mut chat = ChatTranscript::sample(now);

        let sent = chat.post_user("Is it fragile?", now).unwrap();
        assert_eq!(sent.status, MessageStatus::Sending);
        assert!(chat.agent_typing);
        // Own messages never count as unread.
        assert_eq!(chat.unread_count, 0);

        assert!(chat.mark_delivered(&sent.id));
        assert_eq!(chat.messages.last().unwrap().status, MessageStatus::Delivered);

        let reply = chat.post_agent_reply(CANNED_RESPONSES[0], now).unwrap();
        assert!(!chat.agent_typing);
        assert_eq!(reply.agent.unwrap().name, "Sarah Johnson");
        assert_eq!(chat.unread_count, 1);
    }

    #[test]
    fn test_unread_only_while_closed() {
        let now = Utc::now();
        let mut chat = ChatTranscript::sample(now);
        chat.open();
        chat.post_agent_reply(CANNED_RESPONSES[1], now).unwrap();
        assert_eq!(chat.unread_count, 0);

        chat.close();
        chat.post_agent_reply(CANNED_RESPONSES[2], now).unwrap();
        chat.post_agent_reply(CANNED_RESPONSES[3], now).unwrap();
        assert_eq!(chat.unread_count, 2);

        chat.open();
        assert_eq!(chat.unread_count, 0);
    }

    #[test]
    fn test_select_agent_announces() {
        let mut chat = ChatTranscript::waiting();
        let message = chat.select_agent("2", Utc::now()).unwrap();

        assert_eq!(chat.status, ChatStatus::Connected);
        assert_eq!(
            message.content,
            "You're now connected with Mike Chen, Sales Consultant. How can I help you today?"
        );
        assert!(matches!(chat.select_agent("9", Utc::now()), Err(CoreError::AgentNotFound(_))));
    }

    #[test]
    fn test_end_and_rate() {
        let now = Utc::now();
        let mut chat = ChatTranscript::sample(now);

        assert!(matches!(chat.rate(5), Err(CoreError::ChatStillActive)));

        chat.end(now);
        chat.end(now);
        assert_eq!(chat.status, ChatStatus::Ended);
        assert_eq!(chat.messages.len(), 5);
        assert_eq!(chat.messages[4].sender, Sender::System);

        assert!(matches!(chat.post_user("hello?", now), Err(CoreError::ChatEnded)));
        assert!(chat.rate(0).is_err());
        chat.rate(4).unwrap();
        assert_eq!(chat.satisfaction, Some(4));
    }
}
