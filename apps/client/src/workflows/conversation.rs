#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, warn};

use crate::errors::WorkflowError;
use crate::gateway::ResumeApi;
use crate::models::chat::{Message, MessageRole};

/// Read-only view of the conversation workflow's state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    /// Append-only; `id` ordering matches conversation order.
    pub messages: Vec<Message>,
    /// Server-reported counter. Not necessarily the local message count
    /// after a local-only append or a failed exchange.
    pub conversation_length: u64,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Owns the ordered message log scoped to the uploaded document.
///
/// Each exchange runs `Idle → Sending → {Settled, Failed}`: the user
/// message is appended optimistically before the network call, and a
/// failed exchange keeps it — user input is never silently erased.
pub struct ConversationWorkflow {
    api: Arc<dyn ResumeApi>,
    state: Mutex<ConversationState>,
}

impl ConversationWorkflow {
    pub fn new(api: Arc<dyn ResumeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ConversationState::default()),
        }
    }

    pub fn snapshot(&self) -> ConversationState {
        self.lock().clone()
    }

    /// Sends a question about the uploaded document. Empty or
    /// whitespace-only input is a guard, not an error: no state changes
    /// and no network call.
    ///
    /// Overlapping sends are permitted; replies may settle out of order,
    /// but ids are allocated at append time under the lock, so a given
    /// exchange's user message always precedes its own reply and
    /// `conversation_length` is last-write-wins.
    pub async fn send(&self, text: &str) -> Result<(), WorkflowError> {
        if text.trim().is_empty() {
            debug!("ignoring empty chat input");
            return Ok(());
        }

        {
            let mut state = self.lock();
            let id = next_id(&state.messages);
            state.messages.push(Message {
                id,
                role: MessageRole::User,
                content: text.to_string(),
                timestamp: Some(Utc::now()),
                relevant: None,
            });
            state.is_loading = true;
            state.error = None;
        }

        match self.api.chat_ask(text).await {
            Ok(reply) => {
                let mut state = self.lock();
                let id = next_id(&state.messages);
                state.messages.push(Message {
                    id,
                    role: MessageRole::Assistant,
                    content: reply.message,
                    timestamp: Some(Utc::now()),
                    relevant: Some(reply.relevant),
                });
                state.conversation_length = reply.conversation_length;
                state.is_loading = false;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                warn!("chat exchange failed: {err}");
                // The optimistic user message stays in the log.
                let mut state = self.lock();
                state.is_loading = false;
                state.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// Replaces the local log wholesale with the server's history,
    /// re-assigning sequential ids in server order. Replaying an
    /// unchanged history yields an identical local sequence.
    pub async fn fetch_history(&self) -> Result<(), WorkflowError> {
        self.begin();
        match self.api.chat_history().await {
            Ok(history) => {
                let mut state = self.lock();
                state.messages = history
                    .history
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| Message {
                        id: index as u64,
                        role: entry.role,
                        content: entry.content,
                        // The wire history carries no timestamps.
                        timestamp: None,
                        relevant: None,
                    })
                    .collect();
                state.conversation_length = history.conversation_length;
                state.is_loading = false;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                warn!("history fetch failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Clears the server-side history, then the local log. Fail-closed:
    /// on a gateway error the local log is left as-is so the user is not
    /// shown an empty conversation the server still remembers.
    pub async fn clear(&self) -> Result<(), WorkflowError> {
        self.begin();
        match self.api.chat_clear_history().await {
            Ok(()) => {
                self.wipe();
                Ok(())
            }
            Err(err) => {
                warn!("clear failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Resets the assistant server-side, then empties the local log.
    /// Fail-closed like `clear`.
    pub async fn reset(&self) -> Result<(), WorkflowError> {
        self.begin();
        match self.api.chat_reset().await {
            Ok(()) => {
                self.wipe();
                Ok(())
            }
            Err(err) => {
                warn!("reset failed: {err}");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// UI-only message injection. No network call; the produced message
    /// is indistinguishable in shape from a network-derived one.
    pub fn add_local_message(&self, role: MessageRole, content: &str) {
        let mut state = self.lock();
        let id = next_id(&state.messages);
        state.messages.push(Message {
            id,
            role,
            content: content.to_string(),
            timestamp: Some(Utc::now()),
            relevant: None,
        });
    }

    /// Forced local clear. No network call; server state is untouched.
    pub fn clear_messages(&self) {
        let mut state = self.lock();
        state.messages.clear();
        state.conversation_length = 0;
    }

    fn begin(&self) {
        let mut state = self.lock();
        state.is_loading = true;
        state.error = None;
    }

    fn fail(&self, err: &WorkflowError) {
        let mut state = self.lock();
        state.is_loading = false;
        state.error = Some(err.message().to_string());
    }

    fn wipe(&self) {
        let mut state = self.lock();
        state.messages.clear();
        state.conversation_length = 0;
        state.is_loading = false;
        state.error = None;
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().expect("conversation state poisoned")
    }
}

fn next_id(messages: &[Message]) -> u64 {
    messages.last().map(|m| m.id + 1).unwrap_or(0)
}
