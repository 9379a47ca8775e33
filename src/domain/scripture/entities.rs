//! Scripture Context - Entities

use serde::{Deserialize, Serialize};

use super::{BookId, ChapterId, Citation, ScriptureError, VerseId};

/// 章节
///
/// 不变量:
/// - number 为正整数（API.Bible 的 `intro` 伪章节在加载时被剔除）
/// - verse_ids 一旦设置即不可变；None 表示需要按需拉取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    number: u32,
    verse_ids: Option<Vec<VerseId>>,
}

impl Chapter {
    pub fn new(id: ChapterId, number: u32) -> Result<Self, ScriptureError> {
        if number == 0 {
            return Err(ScriptureError::InvalidChapterNumber(id.to_string()));
        }
        Ok(Self {
            id,
            number,
            verse_ids: None,
        })
    }

    /// 附带已知经文列表（预加载变体）
    pub fn with_verse_ids(mut self, verse_ids: Vec<VerseId>) -> Self {
        self.verse_ids = Some(verse_ids);
        self
    }

    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn verse_ids(&self) -> Option<&[VerseId]> {
        self.verse_ids.as_deref()
    }
}

/// 书卷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    name: String,
    chapters: Vec<Chapter>,
}

impl Book {
    pub fn new(id: BookId, name: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            id,
            name: name.into(),
            chapters,
        }
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub(crate) fn into_parts(self) -> (BookId, String, Vec<Chapter>) {
        (self.id, self.name, self.chapters)
    }
}

/// 经文 - 从内容 API 惰性获取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    id: VerseId,
    text: String,
}

impl Verse {
    /// 创建经文，文本两端空白会被裁掉
    pub fn new(id: VerseId, text: impl AsRef<str>) -> Result<Self, ScriptureError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ScriptureError::EmptyVerseText(id));
        }
        Ok(Self {
            id,
            text: text.to_string(),
        })
    }

    pub fn id(&self) -> &VerseId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// 一次抽样的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledVerse {
    pub verse_id: VerseId,
    pub text: String,
    pub citation: Citation,
}

impl SampledVerse {
    /// 带出处的回复文本：`{text} ~ {book}, Kapitel {c}, Vers {v}`
    pub fn with_citation(&self) -> String {
        format!("{} ~ {}", self.text, self.citation)
    }
}
