//! Corpus Index - 启动时加载一次的只读语料快照
//!
//! 所有抽样操作都是对该索引的纯读取

use super::{Book, Chapter, ScriptureError};

/// 扁平化后的单个章节条目
#[derive(Debug, Clone, Copy)]
pub struct ChapterEntry<'a> {
    pub book: &'a Book,
    pub chapter: &'a Chapter,
}

/// 语料索引
///
/// 不变量:
/// - 至少包含一个章节
/// - 构造后只读
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    books: Vec<Book>,
    /// (book 下标, chapter 下标)，跨书卷扁平化
    positions: Vec<(usize, usize)>,
}

impl CorpusIndex {
    pub fn from_books(books: Vec<Book>) -> Result<Self, ScriptureError> {
        let positions: Vec<(usize, usize)> = books
            .iter()
            .enumerate()
            .flat_map(|(b, book)| (0..book.chapters().len()).map(move |c| (b, c)))
            .collect();

        if positions.is_empty() {
            return Err(ScriptureError::EmptyCorpus);
        }

        Ok(Self { books, positions })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// 扁平化后的章节总数
    pub fn chapter_count(&self) -> usize {
        self.positions.len()
    }

    /// 按扁平下标取章节
    pub fn chapter_at(&self, index: usize) -> Option<ChapterEntry<'_>> {
        let (b, c) = *self.positions.get(index)?;
        let book = &self.books[b];
        Some(ChapterEntry {
            book,
            chapter: &book.chapters()[c],
        })
    }

    pub fn chapters(&self) -> impl Iterator<Item = ChapterEntry<'_>> {
        self.positions.iter().map(move |&(b, c)| {
            let book = &self.books[b];
            ChapterEntry {
                book,
                chapter: &book.chapters()[c],
            }
        })
    }

    /// 所有章节的经文列表是否都已预加载
    pub fn verse_lists_known(&self) -> bool {
        self.chapters().all(|entry| entry.chapter.verse_ids().is_some())
    }

    /// 已知的经文总数（有章节未预加载时返回 None）
    pub fn verse_count(&self) -> Option<usize> {
        self.chapters()
            .map(|entry| entry.chapter.verse_ids().map(<[_]>::len))
            .sum()
    }
}
