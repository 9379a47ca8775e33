//! Application State
//!
//! 聊天网关与运维接口共享的状态

use std::sync::Arc;

use crate::application::{ArtifactCachePort, CommandDispatcher, InFlightPort};

/// 应用状态
pub struct AppState {
    pub dispatcher: Arc<CommandDispatcher>,
    pub artifact_cache: Arc<dyn ArtifactCachePort>,
    /// 未启用 in-flight 合并时为 None
    pub inflight: Option<Arc<dyn InFlightPort>>,
    /// 语料中的章节数（启动时确定）
    pub chapter_count: usize,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<CommandDispatcher>,
        artifact_cache: Arc<dyn ArtifactCachePort>,
        inflight: Option<Arc<dyn InFlightPort>>,
        chapter_count: usize,
    ) -> Self {
        Self {
            dispatcher,
            artifact_cache,
            inflight,
            chapter_count,
        }
    }
}
