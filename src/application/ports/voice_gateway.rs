//! Voice Gateway Port - 语音通道传输抽象
//!
//! join 返回会话句柄；会话上的 play 返回播放 dispatcher，
//! dispatcher 暴露完成事件和显式释放。编码/帧封装由传输层自行处理

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::speech::{AudioArtifact, AudioFormat};

/// 语音传输错误
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Failed to connect to voice channel {channel}: {reason}")]
    ConnectFailed { channel: String, reason: String },

    #[error("No audio player available for {0}")]
    NoPlayer(AudioFormat),

    #[error("Failed to start playback: {0}")]
    PlayFailed(String),

    #[error("Playback stream failed: {0}")]
    StreamFailed(String),
}

/// 语音频道引用（发起命令的成员当前所在频道）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceChannelRef(String);

impl VoiceChannelRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 正在进行的一次播放
#[async_trait]
pub trait PlaybackDispatcher: Send {
    /// 等待播放结束（自然结束返回 Ok）
    async fn finished(&mut self) -> Result<(), VoiceError>;

    /// 释放播放资源；可重复调用
    fn destroy(&mut self);
}

/// 一条活动的语音连接
#[async_trait]
pub trait VoiceSession: Send {
    fn channel(&self) -> &VoiceChannelRef;

    /// 开始播放一个音频产物
    async fn play(&mut self, artifact: &AudioArtifact)
        -> Result<Box<dyn PlaybackDispatcher>, VoiceError>;

    /// 断开连接；可重复调用
    fn disconnect(&mut self);
}

/// Voice Gateway Port
#[async_trait]
pub trait VoiceGatewayPort: Send + Sync {
    /// 加入语音频道
    async fn join(&self, channel: &VoiceChannelRef) -> Result<Box<dyn VoiceSession>, VoiceError>;
}
