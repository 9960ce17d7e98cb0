//! Chat with the onboarding buddy or the assistant. Replies are canned and
//! arrive after a short delay.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::deferred::{Deferred, NoRuntime};

const HUMAN_DELAY: Duration = Duration::from_millis(1000);
const ASSISTANT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuddyKind {
    Human,
    Assistant,
}

impl BuddyKind {
    pub fn delay(self) -> Duration {
        match self {
            BuddyKind::Human => HUMAN_DELAY,
            BuddyKind::Assistant => ASSISTANT_DELAY,
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            BuddyKind::Human => "Hi there! I'm Alex, your onboarding buddy. How can I help you today?",
            BuddyKind::Assistant => {
                "Hello! I'm QuickAssist, your AI onboarding assistant. Feel free to ask me anything about the company or your onboarding process!"
            }
        }
    }

    pub fn reply(self) -> &'static str {
        match self {
            BuddyKind::Human => "Thanks for reaching out! I'll check and get back to you on that soon.",
            BuddyKind::Assistant => {
                "That's a great question! Here's what I know about that topic based on the company knowledge base..."
            }
        }
    }
}

impl fmt::Display for BuddyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuddyKind::Human => write!(f, "buddy"),
            BuddyKind::Assistant => write!(f, "assistant"),
        }
    }
}

/// Why a message was not posted. The thread is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("message is blank")]
    Blank,

    #[error("reply cannot be scheduled: {0}")]
    NoRuntime(#[from] NoRuntime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Buddy(BuddyKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
}

/// One chat thread. Dropping it cancels replies still in flight.
#[derive(Debug)]
pub struct Conversation {
    kind: BuddyKind,
    messages: Vec<Message>,
    pending: Vec<Deferred<Message>>,
}

impl Conversation {
    pub fn new(kind: BuddyKind) -> Self {
        Self {
            kind,
            messages: vec![Message {
                sender: Sender::Buddy(kind),
                content: kind.greeting().to_string(),
            }],
            pending: Vec::new(),
        }
    }

    pub fn kind(&self) -> BuddyKind {
        self.kind
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Post a message and schedule the reply.
    ///
    /// Replies are scheduled on the current tokio runtime; without one the
    /// message is refused.
    pub fn send(&mut self, text: &str) -> Result<(), SendError> {
        if text.trim().is_empty() {
            return Err(SendError::Blank);
        }

        let kind = self.kind;
        let reply = Deferred::spawn(kind.delay(), move || Message {
            sender: Sender::Buddy(kind),
            content: kind.reply().to_string(),
        })?;
        self.messages.push(Message {
            sender: Sender::User,
            content: text.to_string(),
        });
        self.pending.push(reply);
        debug!(buddy = %kind, pending = self.pending.len(), "reply scheduled");
        Ok(())
    }

    /// Wait for every scheduled reply and append them in send order.
    pub async fn settle(&mut self) {
        for reply in std::mem::take(&mut self.pending) {
            if let Some(message) = reply.join().await {
                self.messages.push(message);
            }
        }
    }
}
