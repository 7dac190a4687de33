pub mod analysis;
pub mod chat;
pub mod document;
pub mod score;
