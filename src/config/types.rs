//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::SamplingStrategy;
use crate::domain::speech::{AudioFormat, FingerprintScope};

/// 应用主配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// 服务器配置（聊天网关 webhook）
    #[serde(default)]
    pub server: ServerConfig,

    /// 经文内容 API 配置
    #[serde(default)]
    pub scripture: ScriptureConfig,

    /// 语音合成配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音频缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 命令与文案配置
    #[serde(default)]
    pub bot: BotConfig,

    /// 语音输出配置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 经文内容 API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptureConfig {
    /// API 基础 URL
    #[serde(default = "default_scripture_url")]
    pub url: String,

    /// API key（header `api-key`）
    #[serde(default)]
    pub api_key: String,

    /// 译本 ID
    #[serde(default)]
    pub bible_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_scripture_timeout")]
    pub timeout_secs: u64,

    /// 启动时预加载所有章节的经文列表
    #[serde(default)]
    pub preload_verses: bool,

    /// 预加载并发数
    #[serde(default = "default_preload_concurrency")]
    pub preload_concurrency: usize,
}

fn default_scripture_url() -> String {
    "https://api.scripture.api.bible/v1".to_string()
}

fn default_scripture_timeout() -> u64 {
    30
}

fn default_preload_concurrency() -> usize {
    8
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            url: default_scripture_url(),
            api_key: String::new(),
            bible_id: String::new(),
            timeout_secs: default_scripture_timeout(),
            preload_verses: false,
            preload_concurrency: default_preload_concurrency(),
        }
    }
}

/// 合成 provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TtsProviderKind {
    /// Google Translate TTS（simple 模式，MP3）
    #[default]
    Google,
    /// Azure Speech（neural 模式，WAV）
    Azure,
    /// 固定音频文件（本地开发）
    Fake,
}

impl std::fmt::Display for TtsProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
            Self::Azure => f.write_str("azure"),
            Self::Fake => f.write_str("fake"),
        }
    }
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub provider: TtsProviderKind,

    /// 朗读语言
    #[serde(default = "default_language")]
    pub language: String,

    /// 音色（neural 模式；为空时使用 provider 默认音色）
    #[serde(default)]
    pub voice: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// Google TTS 端点
    #[serde(default = "default_google_url")]
    pub google_url: String,

    /// 单次请求最大字符数（simple 模式）
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,

    /// Azure 区域，如 `westeurope`
    #[serde(default)]
    pub azure_region: String,

    /// Azure subscription key
    #[serde(default)]
    pub azure_key: String,

    /// fake provider 返回的音频文件
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,

    /// fake provider 的音频格式
    #[serde(default)]
    pub fake_format: AudioFormat,
}

fn default_language() -> String {
    "de".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

fn default_google_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_chunk_chars() -> usize {
    crate::domain::DEFAULT_MAX_CHARS
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProviderKind::default(),
            language: default_language(),
            voice: String::new(),
            timeout_secs: default_tts_timeout(),
            google_url: default_google_url(),
            chunk_chars: default_chunk_chars(),
            azure_region: String::new(),
            azure_key: String::new(),
            fake_audio_path: None,
            fake_format: AudioFormat::default(),
        }
    }
}

/// 音频缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 缓存目录
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// 指纹覆盖范围：`text` | `text_and_voice`
    #[serde(default)]
    pub fingerprint: FingerprintScope,

    /// 同一指纹的并发合成合并为一次
    #[serde(default = "default_collapse_inflight")]
    pub collapse_inflight: bool,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("tts")
}

fn default_collapse_inflight() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            fingerprint: FingerprintScope::default(),
            collapse_inflight: default_collapse_inflight(),
        }
    }
}

/// 命令与文案配置
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_verse_command")]
    pub verse_command: String,

    #[serde(default = "default_join_command")]
    pub join_command: String,

    /// 文字回复附带出处
    #[serde(default)]
    pub with_citation: bool,

    /// 章节抽样策略：`chapter_uniform` | `verse_weighted`
    #[serde(default)]
    pub sampling: SamplingStrategy,

    /// 固定随机种子
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_not_in_channel")]
    pub not_in_channel: String,

    #[serde(default = "default_generic_failure")]
    pub generic_failure: String,
}

fn default_verse_command() -> String {
    "!bible".to_string()
}

fn default_join_command() -> String {
    "!biblejoin".to_string()
}

fn default_not_in_channel() -> String {
    "Du bist nicht im Channel".to_string()
}

fn default_generic_failure() -> String {
    "Da ist leider etwas schiefgelaufen.".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            verse_command: default_verse_command(),
            join_command: default_join_command(),
            with_citation: false,
            sampling: SamplingStrategy::default(),
            seed: None,
            not_in_channel: default_not_in_channel(),
            generic_failure: default_generic_failure(),
        }
    }
}

/// 语音输出配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VoiceConfig {
    /// 指定播放器命令，为空时自动探测
    #[serde(default)]
    pub player: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.scripture.url, "https://api.scripture.api.bible/v1");
        assert_eq!(config.tts.provider, TtsProviderKind::Google);
        assert_eq!(config.tts.language, "de");
        assert_eq!(config.tts.chunk_chars, 200);
        assert_eq!(config.cache.dir, PathBuf::from("tts"));
        assert_eq!(config.cache.fingerprint, FingerprintScope::Text);
        assert!(config.cache.collapse_inflight);
        assert_eq!(config.bot.verse_command, "!bible");
        assert_eq!(config.bot.join_command, "!biblejoin");
        assert!(!config.bot.with_citation);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }
}
