//! Corpus Loader - 启动时一次性构建语料索引

use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::application::error::ApplicationError;
use crate::application::ports::{BookRecord, ScriptureApiPort};
use crate::domain::scripture::{Book, BookId, Chapter, ChapterId, CorpusIndex};

/// 语料加载选项
#[derive(Debug, Clone)]
pub struct CorpusLoadOptions {
    /// 是否预加载所有章节的经文 ID 列表
    pub preload_verses: bool,
    /// 预加载并发数
    pub preload_concurrency: usize,
}

impl Default for CorpusLoadOptions {
    fn default() -> Self {
        Self {
            preload_verses: false,
            preload_concurrency: 8,
        }
    }
}

/// 把 API 记录转换为书卷，剔除编号不是正整数的伪章节（如 `intro`）
fn to_book(record: BookRecord) -> Book {
    let book_id = BookId::new(&record.id);
    let chapters = record
        .chapters
        .into_iter()
        .filter_map(|chapter| {
            let number = chapter.number.trim().parse::<u32>().ok()?;
            Chapter::new(ChapterId::new(chapter.id), number).ok()
        })
        .collect();
    Book::new(book_id, record.name, chapters)
}

/// 拉取所有章节的经文列表，并发数受限
async fn preload_verse_lists(
    api: &dyn ScriptureApiPort,
    books: Vec<Book>,
    concurrency: usize,
) -> Result<Vec<Book>, ApplicationError> {
    let concurrency = concurrency.max(1);
    let mut loaded = Vec::with_capacity(books.len());

    for book in books {
        let (id, name, chapters) = book.into_parts();
        let chapters: Vec<Chapter> = stream::iter(chapters)
            .map(|chapter| async move {
                let verse_ids = api.fetch_verse_list(chapter.id()).await?;
                Ok::<_, ApplicationError>(chapter.with_verse_ids(verse_ids))
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        tracing::debug!(book = %id, chapters = chapters.len(), "Verse lists preloaded");
        loaded.push(Book::new(id, name, chapters));
    }

    Ok(loaded)
}

/// 加载语料索引
///
/// 任何上游失败都会中止加载
pub async fn load_corpus(
    api: &dyn ScriptureApiPort,
    options: &CorpusLoadOptions,
) -> Result<CorpusIndex, ApplicationError> {
    let records = api.fetch_books().await?;
    let mut books: Vec<Book> = records.into_iter().map(to_book).collect();

    if options.preload_verses {
        books = preload_verse_lists(api, books, options.preload_concurrency).await?;
    }

    let index = CorpusIndex::from_books(books)?;

    tracing::info!(
        books = index.books().len(),
        chapters = index.chapter_count(),
        verses = ?index.verse_count(),
        "Corpus index loaded"
    );

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeScriptureApi;

    #[tokio::test]
    async fn test_intro_chapters_are_skipped() {
        let api = FakeScriptureApi::new()
            .with_intro_chapter("JHN", "John")
            .with_verse("JHN", "John", 3, 16, "Also hat Gott die Welt geliebt");

        let index = load_corpus(&api, &CorpusLoadOptions::default()).await.unwrap();
        assert_eq!(index.chapter_count(), 1);
        assert_eq!(index.chapter_at(0).unwrap().chapter.number(), 3);
        assert!(!index.verse_lists_known());
        assert_eq!(api.verse_list_calls(), 0);
    }

    #[tokio::test]
    async fn test_preload_fetches_every_chapter() {
        let api = FakeScriptureApi::new()
            .with_verse("GEN", "Genesis", 1, 1, "Am Anfang")
            .with_verse("GEN", "Genesis", 1, 2, "Und die Erde")
            .with_verse("GEN", "Genesis", 2, 1, "So wurden vollendet")
            .with_verse("JHN", "John", 3, 16, "Also hat Gott");

        let options = CorpusLoadOptions {
            preload_verses: true,
            preload_concurrency: 2,
        };
        let index = load_corpus(&api, &options).await.unwrap();

        assert!(index.verse_lists_known());
        assert_eq!(index.verse_count(), Some(4));
        assert_eq!(api.verse_list_calls(), 3);
    }

    #[tokio::test]
    async fn test_upstream_failure_aborts_load() {
        let api = FakeScriptureApi::new()
            .with_verse("JHN", "John", 3, 16, "Also hat Gott")
            .failing();

        let result = load_corpus(&api, &CorpusLoadOptions::default()).await;
        assert!(matches!(result, Err(ApplicationError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn test_empty_corpus_is_upstream_error() {
        let api = FakeScriptureApi::new().with_intro_chapter("JHN", "John");
        let result = load_corpus(&api, &CorpusLoadOptions::default()).await;
        assert!(matches!(result, Err(ApplicationError::UpstreamFetch(_))));
    }
}
