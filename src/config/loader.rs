//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsProviderKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BIBLEBOT_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BIBLEBOT_SERVER__PORT=8080`
/// - `BIBLEBOT_SCRIPTURE__API_KEY=...`
/// - `BIBLEBOT_SCRIPTURE__BIBLE_ID=...`
/// - `BIBLEBOT_TTS__PROVIDER=azure`
/// - `BIBLEBOT_CACHE__DIR=/var/lib/biblebot/tts`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("scripture.url", "https://api.scripture.api.bible/v1")?
        .set_default("scripture.timeout_secs", 30)?
        .set_default("scripture.preload_verses", false)?
        .set_default("scripture.preload_concurrency", 8)?
        .set_default("tts.provider", "google")?
        .set_default("tts.language", "de")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("tts.chunk_chars", 200)?
        .set_default("cache.dir", "tts")?
        .set_default("cache.fingerprint", "text")?
        .set_default("cache.collapse_inflight", true)?
        .set_default("bot.verse_command", "!bible")?
        .set_default("bot.join_command", "!biblejoin")?
        .set_default("bot.with_citation", false)?
        .set_default("bot.sampling", "chapter_uniform")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: BIBLEBOT_TTS__AZURE_REGION=westeurope
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("BIBLEBOT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }

    if config.scripture.url.is_empty() {
        return Err(invalid("Scripture API URL cannot be empty"));
    }
    if config.scripture.api_key.is_empty() {
        return Err(invalid("Scripture API key cannot be empty"));
    }
    if config.scripture.bible_id.is_empty() {
        return Err(invalid("Bible id cannot be empty"));
    }
    if config.scripture.preload_verses && config.scripture.preload_concurrency == 0 {
        return Err(invalid("Preload concurrency cannot be 0 when preloading verses"));
    }

    if config.cache.dir.as_os_str().is_empty() {
        return Err(invalid("Cache directory cannot be empty"));
    }

    if config.tts.chunk_chars == 0 {
        return Err(invalid("TTS chunk size cannot be 0"));
    }
    match config.tts.provider {
        TtsProviderKind::Google => {
            if config.tts.google_url.is_empty() {
                return Err(invalid("Google TTS URL cannot be empty"));
            }
        }
        TtsProviderKind::Azure => {
            if config.tts.azure_region.is_empty() || config.tts.azure_key.is_empty() {
                return Err(invalid("Azure provider requires tts.azure_region and tts.azure_key"));
            }
        }
        TtsProviderKind::Fake => {
            if config.tts.fake_audio_path.is_none() {
                return Err(invalid("Fake provider requires tts.fake_audio_path"));
            }
        }
    }

    if config.bot.verse_command.trim().is_empty() || config.bot.join_command.trim().is_empty() {
        return Err(invalid("Bot commands cannot be empty"));
    }
    if config.bot.verse_command.trim() == config.bot.join_command.trim() {
        return Err(invalid("Verse and join commands must differ"));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出密钥
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Scripture API: {}", config.scripture.url);
    tracing::info!("Bible: {}", config.scripture.bible_id);
    tracing::info!("Preload Verses: {}", config.scripture.preload_verses);
    tracing::info!("TTS Provider: {}", config.tts.provider);
    tracing::info!("TTS Language: {}", config.tts.language);
    if !config.tts.voice.is_empty() {
        tracing::info!("TTS Voice: {}", config.tts.voice);
    }
    tracing::info!("Cache Directory: {:?}", config.cache.dir);
    tracing::info!("Cache Fingerprint: {:?}", config.cache.fingerprint);
    tracing::info!("Collapse In-Flight: {}", config.cache.collapse_inflight);
    tracing::info!(
        "Commands: {} / {}",
        config.bot.verse_command,
        config.bot.join_command
    );
    tracing::info!("Sampling: {:?}", config.bot.sampling);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
