//! Scripture Context - Errors

use thiserror::Error;

use super::{ChapterId, VerseId};

#[derive(Debug, Error)]
pub enum ScriptureError {
    #[error("语料为空：没有可抽样的章节")]
    EmptyCorpus,

    #[error("章节没有经文: {0}")]
    EmptyChapter(ChapterId),

    #[error("无效的章节编号: {0}")]
    InvalidChapterNumber(String),

    #[error("无效的经文 ID: {0}")]
    InvalidVerseId(String),

    #[error("经文内容为空: {0}")]
    EmptyVerseText(VerseId),
}
