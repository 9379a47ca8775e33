//! Playback Orchestrator - 语音会话生命周期
//!
//! 状态机: Idle → Connecting → Playing → Finished → Disconnected
//!
//! 连接与开始播放在调用方内完成（传输层拒绝即返回错误）；
//! 等待播放结束可以交给后台任务。结束时先显式释放 dispatcher，再断开会话；
//! 失败或被丢弃时由 guard 在 drop 时完成同样的清理。不做重连或重试

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    PlaybackDispatcher, VoiceChannelRef, VoiceGatewayPort, VoiceSession,
};
use crate::domain::speech::AudioArtifact;

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Connecting,
    Playing,
    Finished,
    Disconnected,
}

/// 一次播放的报告
#[derive(Debug, Clone)]
pub struct PlaybackReport {
    pub channel: VoiceChannelRef,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// 会话 guard：drop 时保证断开
struct SessionGuard {
    session: Box<dyn VoiceSession>,
    released: bool,
}

impl SessionGuard {
    fn disconnect(&mut self) {
        if !self.released {
            self.session.disconnect();
            self.released = true;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(
                channel = %self.session.channel(),
                "Voice session dropped without teardown, disconnecting"
            );
            self.disconnect();
        }
    }
}

/// dispatcher guard：drop 时保证释放
struct DispatcherGuard {
    dispatcher: Box<dyn PlaybackDispatcher>,
    released: bool,
}

impl DispatcherGuard {
    fn destroy(&mut self) {
        if !self.released {
            self.dispatcher.destroy();
            self.released = true;
        }
    }
}

impl Drop for DispatcherGuard {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// 已开始的一次播放
///
/// 持有 dispatcher 与会话；`finish` 等待播放结束并拆除，`detach` 把这一步移到后台任务。
/// 直接 drop 时由 guard 先释放 dispatcher 再断开会话（字段按声明顺序 drop）
pub struct PlaybackHandle {
    dispatcher: DispatcherGuard,
    session: SessionGuard,
    channel: VoiceChannelRef,
    path: PathBuf,
    state: PlaybackState,
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl PlaybackHandle {
    pub fn channel(&self) -> &VoiceChannelRef {
        &self.channel
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// 等待播放结束：Finished → 释放 dispatcher → 断开会话
    pub async fn finish(mut self) -> Result<PlaybackReport, ApplicationError> {
        let outcome = self.dispatcher.dispatcher.finished().await;
        if outcome.is_ok() {
            self.state = transition(&self.channel, self.state, PlaybackState::Finished);
        }

        self.dispatcher.destroy();
        self.session.disconnect();
        self.state = transition(&self.channel, self.state, PlaybackState::Disconnected);

        if let Err(e) = outcome {
            tracing::error!(channel = %self.channel, error = %e, "Playback failed");
            return Err(e.into());
        }

        let elapsed_ms = self.clock.elapsed().as_millis() as u64;
        tracing::info!(
            channel = %self.channel,
            path = %self.path.display(),
            elapsed_ms = elapsed_ms,
            "Playback finished"
        );

        Ok(PlaybackReport {
            channel: self.channel.clone(),
            started_at: self.started_at,
            elapsed_ms,
        })
    }

    /// 在后台任务中完成播放，不受调用方生命周期影响
    pub fn detach(self) -> JoinHandle<Result<PlaybackReport, ApplicationError>> {
        tokio::spawn(self.finish().instrument(tracing::Span::current()))
    }
}

fn transition(channel: &VoiceChannelRef, from: PlaybackState, to: PlaybackState) -> PlaybackState {
    tracing::debug!(channel = %channel, from = ?from, to = ?to, "Playback state changed");
    to
}

/// 播放编排器
pub struct PlaybackOrchestrator {
    gateway: Arc<dyn VoiceGatewayPort>,
}

impl PlaybackOrchestrator {
    pub fn new(gateway: Arc<dyn VoiceGatewayPort>) -> Self {
        Self { gateway }
    }

    /// 加入 `channel` 并开始播放；连接或播放被传输层拒绝时已完成断开
    pub async fn start(
        &self,
        channel: &VoiceChannelRef,
        artifact: &AudioArtifact,
    ) -> Result<PlaybackHandle, ApplicationError> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let state = transition(channel, PlaybackState::Idle, PlaybackState::Connecting);

        let session = self.gateway.join(channel).await.map_err(|e| {
            tracing::error!(channel = %channel, error = %e, "Failed to join voice channel");
            ApplicationError::from(e)
        })?;
        let mut session = SessionGuard {
            session,
            released: false,
        };

        let dispatcher = match session.session.play(artifact).await {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                tracing::error!(channel = %channel, error = %e, "Transport rejected playback");
                session.disconnect();
                transition(channel, state, PlaybackState::Disconnected);
                return Err(e.into());
            }
        };

        Ok(PlaybackHandle {
            dispatcher: DispatcherGuard {
                dispatcher,
                released: false,
            },
            session,
            channel: channel.clone(),
            path: artifact.path().to_path_buf(),
            state: transition(channel, state, PlaybackState::Playing),
            started_at,
            clock,
        })
    }

    /// 在 `channel` 播放一个音频产物，播放结束后返回
    pub async fn play(
        &self,
        channel: &VoiceChannelRef,
        artifact: &AudioArtifact,
    ) -> Result<PlaybackReport, ApplicationError> {
        self.start(channel, artifact).await?.finish().await
    }
}
