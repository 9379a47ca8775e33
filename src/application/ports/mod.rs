//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_cache;
mod inflight;
mod scripture_api;
mod speech_synthesizer;
mod voice_gateway;

pub use artifact_cache::{ArtifactCachePort, CacheError, CacheResolution, CacheStats};
pub use inflight::{InFlightGuard, InFlightPort};
pub use scripture_api::{BookRecord, ChapterRecord, ScriptureApiError, ScriptureApiPort};
pub use speech_synthesizer::{SpeechSynthesizerPort, SynthesisError};
pub use voice_gateway::{
    PlaybackDispatcher, VoiceChannelRef, VoiceError, VoiceGatewayPort, VoiceSession,
};
