//! HTTP Handlers

mod cache;
mod command;
mod ping;

pub use cache::*;
pub use command::*;
pub use ping::*;
