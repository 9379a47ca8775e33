//! Scripture API Port - 经文内容 API 抽象
//!
//! 内容 API 被视为黑盒：返回带稳定标识的书卷/章节/经文数据。
//! 具体实现在 infrastructure/adapters/scripture 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::scripture::{ChapterId, VerseId};

/// 内容 API 错误
#[derive(Debug, Error)]
pub enum ScriptureApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 书卷记录（API 原始形态）
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: String,
    pub name: String,
    pub chapters: Vec<ChapterRecord>,
}

/// 章节记录
///
/// `number` 保持 API 原样（可能是 `intro` 之类的非数字）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: String,
    pub number: String,
}

/// Scripture API Port
#[async_trait]
pub trait ScriptureApiPort: Send + Sync {
    /// 获取所有书卷及其章节
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, ScriptureApiError>;

    /// 获取章节下的经文 ID 列表
    async fn fetch_verse_list(
        &self,
        chapter: &ChapterId,
    ) -> Result<Vec<VerseId>, ScriptureApiError>;

    /// 获取单节经文文本（未裁剪）
    async fn fetch_verse_text(&self, verse: &VerseId) -> Result<String, ScriptureApiError>;
}
