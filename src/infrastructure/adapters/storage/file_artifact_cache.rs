//! File Artifact Cache - 文件系统指纹缓存实现
//!
//! 实现 ArtifactCachePort trait。目录结构：
//!
//! ```text
//! {dir}/
//!   {sha256-hex}.mp3
//!   {sha256-hex}.wav
//! ```

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactCachePort, CacheError, CacheResolution, CacheStats};
use crate::domain::speech::{AudioFormat, Fingerprint, FingerprintScope, SynthesisRequest};

/// 文件系统产物缓存
pub struct FileArtifactCache {
    /// 缓存根目录
    dir: PathBuf,
    /// 当前 provider 的音频格式
    format: AudioFormat,
    scope: FingerprintScope,
}

impl FileArtifactCache {
    /// 创建缓存，目录不存在时自动创建，并清理上次残留的临时文件
    pub async fn new(
        dir: impl AsRef<Path>,
        format: AudioFormat,
        scope: FingerprintScope,
    ) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?;

        let cache = Self { dir, format, scope };
        let removed = cache.remove_stale_temp_files().await?;
        if removed > 0 {
            tracing::info!(
                dir = %cache.dir.display(),
                removed = removed,
                "Removed stale temp files"
            );
        }

        Ok(cache)
    }

    /// 缓存根目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 指纹对应的产物路径
    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir
            .join(format!("{}.{}", fingerprint.as_hex(), self.format.extension()))
    }

    async fn remove_stale_temp_files(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "tmp") {
                if let Err(e) = fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove temp file"
                    );
                } else {
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }
}

#[async_trait]
impl ArtifactCachePort for FileArtifactCache {
    fn scope(&self) -> FingerprintScope {
        self.scope
    }

    async fn resolve(&self, request: &SynthesisRequest) -> Result<CacheResolution, CacheError> {
        let fingerprint = Fingerprint::of(request, self.scope);
        let path = self.path_for(&fingerprint);

        // 存在即命中，不校验内容
        let cached_size = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(meta.len()),
            Ok(_) => None,
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(CacheError::IoError(e.to_string())),
        };

        Ok(CacheResolution {
            fingerprint,
            path,
            format: self.format,
            cached_size,
        })
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut stats = CacheStats::default();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?
        {
            let path = entry.path();
            let is_artifact = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Fingerprint::parse)
                .is_some()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(AudioFormat::from_extension)
                    .is_some();
            if !is_artifact {
                continue;
            }

            let meta = entry
                .metadata()
                .await
                .map_err(|e| CacheError::IoError(e.to_string()))?;
            stats.total_entries += 1;
            stats.total_size_bytes += meta.len();
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest::new(text, "de", "")
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let root = tempdir().unwrap();
        let dir = root.path().join("tts");
        assert!(!dir.exists());

        let cache = FileArtifactCache::new(&dir, AudioFormat::Mp3, FingerprintScope::Text)
            .await
            .unwrap();
        assert!(cache.dir().is_dir());
    }

    #[tokio::test]
    async fn test_resolve_path_and_presence() {
        let dir = tempdir().unwrap();
        let cache = FileArtifactCache::new(dir.path(), AudioFormat::Mp3, FingerprintScope::Text)
            .await
            .unwrap();

        let miss = cache.resolve(&request("abc")).await.unwrap();
        assert!(miss.needs_synthesis());
        assert_eq!(
            miss.path,
            dir.path()
                .join("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.mp3")
        );

        fs::write(&miss.path, b"ID3").await.unwrap();
        let hit = cache.resolve(&request("abc")).await.unwrap();
        assert_eq!(hit.cached_size, Some(3));
        assert_eq!(hit.cached_artifact().unwrap().path(), miss.path.as_path());
    }

    #[tokio::test]
    async fn test_extension_follows_format() {
        let dir = tempdir().unwrap();
        let cache = FileArtifactCache::new(dir.path(), AudioFormat::Wav, FingerprintScope::Text)
            .await
            .unwrap();

        let resolution = cache.resolve(&request("abc")).await.unwrap();
        assert_eq!(resolution.path.extension().unwrap(), "wav");
        assert_eq!(resolution.format, AudioFormat::Wav);
    }

    #[tokio::test]
    async fn test_stats_counts_artifacts_only() {
        let dir = tempdir().unwrap();
        let cache = FileArtifactCache::new(dir.path(), AudioFormat::Mp3, FingerprintScope::Text)
            .await
            .unwrap();

        for text in ["eins", "zwei"] {
            let resolution = cache.resolve(&request(text)).await.unwrap();
            fs::write(&resolution.path, b"12345").await.unwrap();
        }
        fs::write(dir.path().join("notes.txt"), b"ignored").await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_size_bytes, 10);
    }

    #[tokio::test]
    async fn test_stale_temp_files_removed_on_open() {
        let dir = tempdir().unwrap();
        let stale = dir.path().join(".abc.1234.tmp");
        fs::write(&stale, b"partial").await.unwrap();

        FileArtifactCache::new(dir.path(), AudioFormat::Mp3, FingerprintScope::Text)
            .await
            .unwrap();
        assert!(!stale.exists());
    }
}
