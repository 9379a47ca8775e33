//! Player Voice Gateway - 通过系统播放器输出到本地音频设备
//!
//! join 建立一个逻辑会话；play 为每个产物启动一个播放器子进程，
//! 子进程退出即播放结束。destroy 终止子进程，disconnect 结束会话

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};

use crate::application::ports::{
    PlaybackDispatcher, VoiceChannelRef, VoiceError, VoiceGatewayPort, VoiceSession,
};
use crate::domain::speech::{AudioArtifact, AudioFormat};

/// 支持 WAV 的播放器（按优先级）
#[cfg(target_os = "macos")]
const WAV_PLAYERS: &[&str] = &["afplay"];
#[cfg(not(target_os = "macos"))]
const WAV_PLAYERS: &[&str] = &["paplay", "aplay", "play", "mpv", "ffplay"];

/// 支持 MP3/OGG 的播放器；paplay/aplay 只能播 PCM
#[cfg(target_os = "macos")]
const MP3_PLAYERS: &[&str] = &["afplay"];
#[cfg(not(target_os = "macos"))]
const MP3_PLAYERS: &[&str] = &["mpv", "ffplay", "play"];

/// 播放器配置
#[derive(Debug, Clone, Default)]
pub struct PlayerVoiceConfig {
    /// 指定播放器命令（可带参数，如 `mpv --volume=80`），为空时自动探测
    pub player: Option<String>,
}

/// 系统播放器语音网关
pub struct PlayerVoiceGateway {
    config: PlayerVoiceConfig,
}

impl PlayerVoiceGateway {
    pub fn new(config: PlayerVoiceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl VoiceGatewayPort for PlayerVoiceGateway {
    async fn join(&self, channel: &VoiceChannelRef) -> Result<Box<dyn VoiceSession>, VoiceError> {
        if channel.as_str().trim().is_empty() {
            return Err(VoiceError::ConnectFailed {
                channel: channel.to_string(),
                reason: "empty channel reference".to_string(),
            });
        }

        tracing::info!(channel = %channel, "Voice session connected");
        Ok(Box::new(PlayerSession {
            channel: channel.clone(),
            player: self.config.player.clone(),
            connected: true,
        }))
    }
}

struct PlayerSession {
    channel: VoiceChannelRef,
    player: Option<String>,
    connected: bool,
}

#[async_trait]
impl VoiceSession for PlayerSession {
    fn channel(&self) -> &VoiceChannelRef {
        &self.channel
    }

    async fn play(
        &mut self,
        artifact: &AudioArtifact,
    ) -> Result<Box<dyn PlaybackDispatcher>, VoiceError> {
        if !self.connected {
            return Err(VoiceError::PlayFailed("session already disconnected".to_string()));
        }
        if !artifact.path().is_file() {
            return Err(VoiceError::PlayFailed(format!(
                "artifact not found: {}",
                artifact.path().display()
            )));
        }

        let (program, mut args) = match &self.player {
            Some(command) => split_command(command),
            None => None,
        }
        .or_else(|| detect_player(artifact.format()).map(|p| (p.to_string(), Vec::new())))
        .ok_or(VoiceError::NoPlayer(artifact.format()))?;

        if which::which(&program).is_err() {
            return Err(VoiceError::NoPlayer(artifact.format()));
        }
        args.extend(build_player_args(&program, artifact.path()));

        tracing::debug!(
            channel = %self.channel,
            player = %program,
            path = %artifact.path().display(),
            "Starting playback"
        );

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| VoiceError::PlayFailed(format!("{}: {}", program, e)))?;

        Ok(Box::new(PlayerDispatcher {
            player: program,
            child: Some(child),
        }))
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            tracing::info!(channel = %self.channel, "Voice session disconnected");
        }
    }
}

struct PlayerDispatcher {
    player: String,
    child: Option<Child>,
}

#[async_trait]
impl PlaybackDispatcher for PlayerDispatcher {
    async fn finished(&mut self) -> Result<(), VoiceError> {
        let child = self
            .child
            .as_mut()
            .ok_or_else(|| VoiceError::StreamFailed("playback already destroyed".to_string()))?;

        let status = child
            .wait()
            .await
            .map_err(|e| VoiceError::StreamFailed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(VoiceError::StreamFailed(format!(
                "{} exited with {}",
                self.player, status
            )))
        }
    }

    fn destroy(&mut self) {
        if let Some(mut child) = self.child.take() {
            // 已退出的进程 kill 会失败，忽略
            let _ = child.start_kill();
        }
    }
}

/// 选择支持该格式且已安装的播放器
fn detect_player(format: AudioFormat) -> Option<&'static str> {
    let players = match format {
        AudioFormat::Wav => WAV_PLAYERS,
        AudioFormat::Mp3 | AudioFormat::Ogg => MP3_PLAYERS,
    };

    players
        .iter()
        .copied()
        .find(|player| which::which(player).is_ok())
}

fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// 播放器参数：无窗口、播完自动退出
fn build_player_args(player: &str, path: &Path) -> Vec<String> {
    let path_str = path.to_string_lossy().to_string();
    let name = Path::new(player)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(player);

    match name {
        "ffplay" => vec![
            "-nodisp".to_string(),
            "-autoexit".to_string(),
            "-loglevel".to_string(),
            "quiet".to_string(),
            path_str,
        ],
        "mpv" => vec![
            "--no-video".to_string(),
            "--really-quiet".to_string(),
            path_str,
        ],
        _ => vec![path_str],
    }
}
