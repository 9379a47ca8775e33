//! Storage Adapter - 文件系统音频产物缓存

mod file_artifact_cache;

pub use file_artifact_cache::FileArtifactCache;
