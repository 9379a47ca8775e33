//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ScriptureApi、SpeechSynthesizer、ArtifactCache、VoiceGateway、InFlight）
//! - services: 语料加载、经文抽样、语音流水线、播放编排
//! - commands: 聊天命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use commands::{
    handlers::{
        CommandDispatcher, JoinAndSpeakHandler, JoinAndSpeakResponse, RandomVerseHandler,
        VoiceProfile,
    },
    BotCommand, BotMessages, CommandEvent, CommandOutcome, CommandReply, CommandSet,
};

pub use error::ApplicationError;

pub use ports::{
    // Artifact cache
    ArtifactCachePort,
    CacheError,
    CacheResolution,
    CacheStats,
    // In-flight registry
    InFlightGuard,
    InFlightPort,
    // Scripture API
    BookRecord,
    ChapterRecord,
    ScriptureApiError,
    ScriptureApiPort,
    // Speech synthesizer
    SpeechSynthesizerPort,
    SynthesisError,
    // Voice gateway
    PlaybackDispatcher,
    VoiceChannelRef,
    VoiceError,
    VoiceGatewayPort,
    VoiceSession,
};

pub use services::{
    load_corpus, CorpusLoadOptions, PlaybackHandle, PlaybackOrchestrator, PlaybackReport,
    PlaybackState, PreparedSpeech, SamplingStrategy, SpeechPipeline, VerseSampler,
};
