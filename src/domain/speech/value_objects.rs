//! Speech Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 音频格式
///
/// 由合成 provider 决定，对上层不透明，只用于决定缓存文件扩展名和播放器选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// 合成请求
///
/// 值类型，按字段完全相等比较
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// 要朗读的文本（原样，不做归一化）
    pub text: String,
    /// 语言标签，如 `de` / `de-DE`
    pub language: String,
    /// 音色 ID（simple 模式下可为空）
    pub voice: String,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        language: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            voice: voice.into(),
        }
    }
}

/// 音频产物 - 持久化在由指纹决定的路径上
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    path: PathBuf,
    format: AudioFormat,
    size_bytes: u64,
}

impl AudioArtifact {
    pub fn new(path: PathBuf, format: AudioFormat, size_bytes: u64) -> Self {
        Self {
            path,
            format,
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}
