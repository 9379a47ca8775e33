//! Scripture Context - Value Objects

use serde::{Deserialize, Serialize};

/// 书卷标识（API.Bible 形如 `JHN`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节标识（形如 `JHN.3`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(String);

impl ChapterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 经文标识（形如 `JHN.3.16`，编码了书卷/章/节位置）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseId(String);

impl VerseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 从 ID 的最后一段解析节号
    ///
    /// `JHN.3.16` -> 16；最后一段不是正整数时返回 None
    pub fn verse_number(&self) -> Option<u32> {
        self.0
            .rsplit('.')
            .next()
            .and_then(|last| last.parse::<u32>().ok())
            .filter(|n| *n > 0)
    }
}

impl std::fmt::Display for VerseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 引用 - 面向用户的出处展示
///
/// 每次抽样构造，不持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub book_name: String,
    pub chapter_number: u32,
    pub verse_number: u32,
}

impl Citation {
    pub fn new(book_name: impl Into<String>, chapter_number: u32, verse_number: u32) -> Self {
        Self {
            book_name: book_name.into(),
            chapter_number,
            verse_number,
        }
    }
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, Kapitel {}, Vers {}",
            self.book_name, self.chapter_number, self.verse_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_number_from_id() {
        assert_eq!(VerseId::new("JHN.3.16").verse_number(), Some(16));
        assert_eq!(VerseId::new("GEN.1.1").verse_number(), Some(1));
        assert_eq!(VerseId::new("JHN.intro").verse_number(), None);
        assert_eq!(VerseId::new("JHN.3.0").verse_number(), None);
    }

    #[test]
    fn test_citation_display() {
        let citation = Citation::new("John", 3, 16);
        assert_eq!(citation.to_string(), "John, Kapitel 3, Vers 16");
    }
}
