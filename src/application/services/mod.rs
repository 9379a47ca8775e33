//! Application Services - 核心流程
//!
//! - corpus_loader: 启动时构建语料索引
//! - verse_sampler: 两阶段经文抽样
//! - speech_pipeline: 指纹缓存 + 按需合成
//! - playback_orchestrator: 语音会话与播放生命周期

mod corpus_loader;
mod playback_orchestrator;
mod speech_pipeline;
mod verse_sampler;

pub use corpus_loader::{load_corpus, CorpusLoadOptions};
pub use playback_orchestrator::{
    PlaybackHandle, PlaybackOrchestrator, PlaybackReport, PlaybackState,
};
pub use speech_pipeline::{PreparedSpeech, SpeechPipeline};
pub use verse_sampler::{SamplingStrategy, VerseSampler};
