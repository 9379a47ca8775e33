//! BibleBot - 随机经文聊天机器人
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Scripture Context: 书卷/章节/经文与语料索引
//! - Speech Context: 合成请求、内容指纹、音频产物
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ScriptureApi, SpeechSynthesizer, ArtifactCache, VoiceGateway, InFlight）
//! - Services: 经文抽样、语音流水线、播放编排
//! - Commands: 聊天命令分发与处理
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 聊天网关 webhook
//! - Memory: 按指纹的 in-flight 登记
//! - Adapters: API.Bible 客户端、TTS provider、文件缓存、系统播放器

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
