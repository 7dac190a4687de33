//! The four workflow state containers. Each owns one slice of session
//! state plus the async operations that mutate it; nothing outside a
//! workflow writes its state. Mutations happen under a short-lived lock
//! that is never held across an await, so every update is atomic from the
//! caller's perspective and the only suspension points are gateway calls.

pub mod analysis;
pub mod conversation;
pub mod document;
pub mod scoring;

#[cfg(test)]
pub mod support;
