//! Artifact Cache Port - 基于内容指纹的音频产物缓存
//!
//! 磁盘上的一个扁平目录，文件名为指纹十六进制 + 扩展名，没有索引文件：
//! 文件存在即命中。
//!
//! 存在性检查与写入不是原子的：同一文本的两个并发请求可能都判定为缺失并各自合成，
//! 第二次写入以等价内容覆盖第一次

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::speech::{
    AudioArtifact, AudioFormat, Fingerprint, FingerprintScope, SynthesisRequest,
};

/// 缓存错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// 一次 resolve 的结果
#[derive(Debug, Clone)]
pub struct CacheResolution {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
    pub format: AudioFormat,
    /// 命中时的文件大小；None 表示需要合成
    pub cached_size: Option<u64>,
}

impl CacheResolution {
    pub fn needs_synthesis(&self) -> bool {
        self.cached_size.is_none()
    }

    /// 命中时直接复用的产物（不做完整性校验）
    pub fn cached_artifact(&self) -> Option<AudioArtifact> {
        self.cached_size
            .map(|size| AudioArtifact::new(self.path.clone(), self.format, size))
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size_bytes: u64,
}

/// Artifact Cache Port
#[async_trait]
pub trait ArtifactCachePort: Send + Sync {
    /// 指纹覆盖范围
    fn scope(&self) -> FingerprintScope;

    /// 计算指纹、推导路径并检查是否已存在
    async fn resolve(&self, request: &SynthesisRequest) -> Result<CacheResolution, CacheError>;

    /// 获取缓存统计信息
    async fn stats(&self) -> Result<CacheStats, CacheError>;
}
