//! Command Handlers

mod dispatcher;
mod verse_handlers;

pub use dispatcher::CommandDispatcher;
pub use verse_handlers::{
    JoinAndSpeakHandler, JoinAndSpeakResponse, RandomVerseHandler, VoiceProfile,
};
