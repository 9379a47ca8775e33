//! Bot Commands - 聊天命令与回复
//!
//! 命令事件由 Chat Gateway 投递，携带发起成员当前所在的语音频道（如果有）

use serde::Serialize;

use crate::application::ports::VoiceChannelRef;

/// 一条来自聊天网关的消息
#[derive(Debug, Clone)]
pub struct CommandEvent {
    pub content: String,
    pub author: Option<String>,
    pub voice_channel: Option<VoiceChannelRef>,
}

/// 可识别的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// 文字回复一节随机经文
    RandomVerse,
    /// 加入语音频道朗读一节随机经文
    JoinAndSpeak,
}

/// 命令字符串配置
#[derive(Debug, Clone)]
pub struct CommandSet {
    pub verse_command: String,
    pub join_command: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            verse_command: "!bible".to_string(),
            join_command: "!biblejoin".to_string(),
        }
    }
}

impl CommandSet {
    /// 精确匹配（忽略两端空白）
    pub fn parse(&self, content: &str) -> Option<BotCommand> {
        let content = content.trim();
        if content == self.verse_command {
            Some(BotCommand::RandomVerse)
        } else if content == self.join_command {
            Some(BotCommand::JoinAndSpeak)
        } else {
            None
        }
    }
}

/// 面向用户的固定文案
#[derive(Debug, Clone)]
pub struct BotMessages {
    pub not_in_channel: String,
    pub generic_failure: String,
}

impl Default for BotMessages {
    fn default() -> Self {
        Self {
            not_in_channel: "Du bist nicht im Channel".to_string(),
            generic_failure: "Da ist leider etwas schiefgelaufen.".to_string(),
        }
    }
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// 非命令消息
    Ignored,
    /// 已文字回复
    Replied,
    /// 已在语音频道开始播放
    Playing {
        channel: String,
        fingerprint: String,
        cache_hit: bool,
    },
    /// 失败（已转换为用户回复）
    Failed { error: String },
}

/// 返回给聊天网关的回复
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply {
    pub reply: Option<String>,
    pub outcome: CommandOutcome,
}

impl CommandReply {
    pub fn ignored() -> Self {
        Self {
            reply: None,
            outcome: CommandOutcome::Ignored,
        }
    }

    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            outcome: CommandOutcome::Replied,
        }
    }
}
