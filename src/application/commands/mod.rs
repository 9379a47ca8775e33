//! Commands - 聊天命令及处理器

mod bot_commands;
pub mod handlers;

pub use bot_commands::{
    BotCommand, BotMessages, CommandEvent, CommandOutcome, CommandReply, CommandSet,
};
