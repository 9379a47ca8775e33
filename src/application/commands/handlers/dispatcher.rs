//! Command Dispatcher - 命令调用边界
//!
//! 所有失败在这里记录日志并转换成用户回复，不向外传播、不重试

use tracing::Instrument;
use uuid::Uuid;

use crate::application::commands::bot_commands::{
    BotCommand, BotMessages, CommandEvent, CommandOutcome, CommandReply, CommandSet,
};
use crate::application::commands::handlers::{JoinAndSpeakHandler, RandomVerseHandler};
use crate::application::error::ApplicationError;

/// 命令分发器
pub struct CommandDispatcher {
    commands: CommandSet,
    messages: BotMessages,
    random_verse_handler: RandomVerseHandler,
    join_and_speak_handler: JoinAndSpeakHandler,
}

impl CommandDispatcher {
    pub fn new(
        commands: CommandSet,
        messages: BotMessages,
        random_verse_handler: RandomVerseHandler,
        join_and_speak_handler: JoinAndSpeakHandler,
    ) -> Self {
        Self {
            commands,
            messages,
            random_verse_handler,
            join_and_speak_handler,
        }
    }

    pub async fn dispatch(&self, event: CommandEvent) -> CommandReply {
        let Some(command) = self.commands.parse(&event.content) else {
            return CommandReply::ignored();
        };

        let span = tracing::info_span!(
            "command",
            invocation_id = %Uuid::new_v4(),
            command = ?command,
            author = event.author.as_deref().unwrap_or("-"),
        );

        async move {
            tracing::info!(voice_channel = ?event.voice_channel, "Command received");
            let result = match command {
                BotCommand::RandomVerse => self
                    .random_verse_handler
                    .handle()
                    .await
                    .map(CommandReply::text),
                BotCommand::JoinAndSpeak => self
                    .join_and_speak_handler
                    .handle(event.voice_channel.as_ref())
                    .await
                    .map(|response| CommandReply {
                        reply: None,
                        outcome: CommandOutcome::Playing {
                            channel: response.channel.to_string(),
                            fingerprint: response.speech.fingerprint.to_string(),
                            cache_hit: response.speech.cache_hit,
                        },
                    }),
            };

            match result {
                Ok(reply) => reply,
                Err(e) => self.failure_reply(e),
            }
        }
        .instrument(span)
        .await
    }

    fn failure_reply(&self, error: ApplicationError) -> CommandReply {
        let reply = match &error {
            ApplicationError::NoChannel => {
                tracing::info!("Member is not in a voice channel");
                self.messages.not_in_channel.clone()
            }
            other => {
                tracing::error!(kind = other.kind(), error = %other, "Command failed");
                self.messages.generic_failure.clone()
            }
        };

        CommandReply {
            reply: Some(reply),
            outcome: CommandOutcome::Failed {
                error: error.kind().to_string(),
            },
        }
    }
}
