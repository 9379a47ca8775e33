//! 内容指纹 - SHA-256 摘要
//!
//! 默认只对朗读文本取摘要（与既有缓存目录兼容）；
//! 同一文本可能对应多种语言/音色时可切换到 `TextAndVoice`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::SynthesisRequest;

/// 指纹覆盖的字段范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintScope {
    /// 仅文本
    #[default]
    Text,
    /// 语言 + 音色 + 文本
    TextAndVoice,
}

/// 256 位内容指纹（64 个小写十六进制字符）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(request: &SynthesisRequest, scope: FingerprintScope) -> Self {
        let mut hasher = Sha256::new();
        if scope == FingerprintScope::TextAndVoice {
            hasher.update(request.language.as_bytes());
            hasher.update(b"\n");
            hasher.update(request.voice.as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(request.text.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// 从十六进制字符串解析（用于扫描缓存目录）
    pub fn parse(hex_digest: &str) -> Option<Self> {
        let valid = hex_digest.len() == 64
            && hex_digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Self(hex_digest.to_string()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// 日志用短前缀
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
