//! 应用层错误定义
//!
//! 命令调用边界上的统一错误分类

use thiserror::Error;

use crate::application::ports::{CacheError, ScriptureApiError, SynthesisError, VoiceError};
use crate::domain::scripture::ScriptureError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 内容 API 不可达或返回畸形数据
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// 发起者不在语音频道
    #[error("Requesting member is not in a voice channel")]
    NoChannel,

    /// 合成 provider 拒绝请求
    #[error("Synthesis failed: {reason}")]
    Synthesis { reason: String },

    /// 语音传输失败
    #[error("Playback failed: {0}")]
    Playback(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建上游错误
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFetch(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 错误类别（日志与响应用）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamFetch(_) => "upstream_fetch",
            Self::NoChannel => "no_channel",
            Self::Synthesis { .. } => "synthesis",
            Self::Playback(_) => "playback",
            Self::StorageError(_) => "storage",
            Self::InternalError(_) => "internal",
        }
    }
}

impl From<ScriptureApiError> for ApplicationError {
    fn from(err: ScriptureApiError) -> Self {
        Self::UpstreamFetch(err.to_string())
    }
}

impl From<ScriptureError> for ApplicationError {
    fn from(err: ScriptureError) -> Self {
        Self::UpstreamFetch(err.to_string())
    }
}

impl From<SynthesisError> for ApplicationError {
    fn from(err: SynthesisError) -> Self {
        Self::Synthesis {
            reason: err.to_string(),
        }
    }
}

impl From<CacheError> for ApplicationError {
    fn from(err: CacheError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        Self::Playback(err.to_string())
    }
}
