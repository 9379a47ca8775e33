//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::speech::FingerprintScope;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Command DTOs
// ============================================================================

/// 聊天网关投递的一条消息
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    /// 发起者当前所在的语音频道
    #[serde(default)]
    pub voice_channel: Option<String>,
}

// ============================================================================
// Cache DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub total_bytes: u64,
    pub in_flight: usize,
    pub fingerprint: FingerprintScope,
}
