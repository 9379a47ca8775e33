//! Verse Sampler - 两阶段随机经文抽样
//!
//! 1. 把所有书卷的章节扁平化，均匀抽一个章节（长书卷不会被加权）
//! 2. 在该章节内均匀抽一节
//! 3. 拉取该节文本并裁剪两端空白
//!
//! 这样每个章节概率相等、章节内每节概率相等，因此短章节里的经文整体概率更高。
//! 这是有意保留的行为；`VerseWeighted` 按章节经文数加权抽章节，
//! 得到对所有经文均匀的分布，但需要预加载经文列表

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::application::error::ApplicationError;
use crate::application::ports::ScriptureApiPort;
use crate::domain::scripture::{Citation, CorpusIndex, SampledVerse, ScriptureError, Verse, VerseId};

/// 章节抽样策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// 每个章节等概率
    #[default]
    ChapterUniform,
    /// 章节权重 = 经文数（对经文均匀）
    VerseWeighted,
}

/// 经文抽样器
pub struct VerseSampler {
    api: Arc<dyn ScriptureApiPort>,
    corpus: Arc<CorpusIndex>,
    /// 仅 VerseWeighted 且经文列表齐全时存在
    weights: Option<WeightedIndex<usize>>,
    rng: Mutex<StdRng>,
}

impl VerseSampler {
    pub fn new(
        api: Arc<dyn ScriptureApiPort>,
        corpus: Arc<CorpusIndex>,
        strategy: SamplingStrategy,
    ) -> Self {
        let weights = match strategy {
            SamplingStrategy::ChapterUniform => None,
            SamplingStrategy::VerseWeighted => Self::verse_weights(&corpus),
        };

        Self {
            api,
            corpus,
            weights,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 固定随机种子（测试、复现）
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn verse_weights(corpus: &CorpusIndex) -> Option<WeightedIndex<usize>> {
        if !corpus.verse_lists_known() {
            tracing::warn!(
                "Verse-weighted sampling needs preloaded verse lists, \
                 falling back to chapter-uniform"
            );
            return None;
        }

        let weights = corpus
            .chapters()
            .map(|entry| entry.chapter.verse_ids().map_or(0, <[_]>::len));
        match WeightedIndex::new(weights) {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Invalid verse weights, falling back to chapter-uniform"
                );
                None
            }
        }
    }

    fn pick_chapter(&self) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        match &self.weights {
            Some(weights) => weights.sample(&mut *rng),
            None => rng.gen_range(0..self.corpus.chapter_count()),
        }
    }

    fn pick_verse(&self, verse_ids: &[VerseId]) -> Option<VerseId> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        verse_ids.choose(&mut *rng).cloned()
    }

    /// 抽取一节经文
    ///
    /// 章节经文列表未预加载时会多一次网络请求；经文文本不在此层缓存
    pub async fn sample(&self) -> Result<SampledVerse, ApplicationError> {
        let index = self.pick_chapter();
        let entry = self
            .corpus
            .chapter_at(index)
            .ok_or_else(|| {
                ApplicationError::internal(format!("chapter index {} out of range", index))
            })?;

        let verse_id = match entry.chapter.verse_ids() {
            Some(known) => self.pick_verse(known),
            None => {
                let fetched = self.api.fetch_verse_list(entry.chapter.id()).await?;
                self.pick_verse(&fetched)
            }
        }
        .ok_or_else(|| ScriptureError::EmptyChapter(entry.chapter.id().clone()))?;

        let verse_number = verse_id
            .verse_number()
            .ok_or_else(|| ScriptureError::InvalidVerseId(verse_id.to_string()))?;

        let raw = self.api.fetch_verse_text(&verse_id).await?;
        let verse = Verse::new(verse_id.clone(), raw)?;

        tracing::debug!(
            verse_id = %verse_id,
            book = entry.book.name(),
            chapter = entry.chapter.number(),
            "Verse sampled"
        );

        Ok(SampledVerse {
            verse_id,
            text: verse.text().to_string(),
            citation: Citation::new(entry.book.name(), entry.chapter.number(), verse_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{load_corpus, CorpusLoadOptions};
    use crate::application::testing::FakeScriptureApi;

    async fn sampler(
        api: FakeScriptureApi,
        preload: bool,
        strategy: SamplingStrategy,
    ) -> VerseSampler {
        let api = Arc::new(api);
        let options = CorpusLoadOptions {
            preload_verses: preload,
            preload_concurrency: 4,
        };
        let corpus = load_corpus(&*api, &options).await.unwrap();
        VerseSampler::new(api, Arc::new(corpus), strategy).with_seed(42)
    }

    /// 3 个章节，经文数分别为 1、4、10
    fn uneven_api() -> FakeScriptureApi {
        let mut api = FakeScriptureApi::new().with_verse("RUT", "Ruth", 1, 1, "Zur Zeit");
        for v in 1..=4 {
            api = api.with_verse("RUT", "Ruth", 2, v, &format!("Ruth 2,{}", v));
        }
        for v in 1..=10 {
            api = api.with_verse("PSA", "Psalms", 119, v, &format!("Psalm 119,{}", v));
        }
        api
    }

    #[tokio::test]
    async fn test_single_chapter_returns_that_verse() {
        let api = FakeScriptureApi::new().with_verse(
            "JHN",
            "John",
            3,
            16,
            "  For God so loved the world...\n",
        );
        let sampler = sampler(api, false, SamplingStrategy::ChapterUniform).await;

        let verse = sampler.sample().await.unwrap();
        assert_eq!(verse.text, "For God so loved the world...");
        assert_eq!(verse.citation, Citation::new("John", 3, 16));
        assert_eq!(verse.verse_id, VerseId::new("JHN.3.16"));
    }

    #[tokio::test]
    async fn test_citation_is_member_of_sampled_chapter() {
        let api = uneven_api();
        let sampler = sampler(api.clone(), false, SamplingStrategy::ChapterUniform).await;

        for _ in 0..200 {
            let verse = sampler.sample().await.unwrap();
            assert!(!verse.text.is_empty());
            let chapter_id = format!(
                "{}.{}",
                verse.verse_id.as_str().split('.').next().unwrap(),
                verse.citation.chapter_number
            );
            let members = api.verse_ids_of(&chapter_id);
            assert!(members.contains(&verse.verse_id), "{} not in {}", verse.verse_id, chapter_id);
        }
    }

    #[tokio::test]
    async fn test_chapter_selection_is_uniform_regardless_of_length() {
        let sampler = sampler(uneven_api(), true, SamplingStrategy::ChapterUniform).await;

        let draws = 30_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            counts[sampler.pick_chapter()] += 1;
        }

        let expected = draws as f64 / 3.0;
        for count in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "counts {:?} not uniform", counts);
        }
    }

    #[tokio::test]
    async fn test_verse_weighted_favors_long_chapters() {
        let sampler = sampler(uneven_api(), true, SamplingStrategy::VerseWeighted).await;

        let draws = 30_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            counts[sampler.pick_chapter()] += 1;
        }

        // 期望比例 1/15, 4/15, 10/15
        let share = |i: usize| counts[i] as f64 / draws as f64;
        assert!((share(0) - 1.0 / 15.0).abs() < 0.02, "counts {:?}", counts);
        assert!((share(2) - 10.0 / 15.0).abs() < 0.02, "counts {:?}", counts);
    }

    #[tokio::test]
    async fn test_verse_weighted_without_preload_falls_back() {
        let sampler = sampler(uneven_api(), false, SamplingStrategy::VerseWeighted).await;
        assert!(sampler.weights.is_none());
        assert!(sampler.sample().await.is_ok());
    }

    #[tokio::test]
    async fn test_preloaded_lists_skip_verse_list_fetch() {
        let api = FakeScriptureApi::new().with_verse("JHN", "John", 3, 16, "Also hat Gott");
        let sampler = sampler(api.clone(), true, SamplingStrategy::ChapterUniform).await;
        let before = api.verse_list_calls();

        sampler.sample().await.unwrap();
        assert_eq!(api.verse_list_calls(), before);
        assert_eq!(api.verse_text_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_chapter_is_upstream_error() {
        let api = FakeScriptureApi::new().with_empty_chapter("OBA", "Obadiah", 1);
        let sampler = sampler(api, false, SamplingStrategy::ChapterUniform).await;

        let result = sampler.sample().await;
        assert!(matches!(result, Err(ApplicationError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_upstream_error() {
        let api = FakeScriptureApi::new().with_verse("JHN", "John", 3, 16, "Also hat Gott");
        let sampler = sampler(api.clone(), false, SamplingStrategy::ChapterUniform).await;

        api.set_failing(true);
        let result = sampler.sample().await;
        assert!(matches!(result, Err(ApplicationError::UpstreamFetch(_))));
    }
}
