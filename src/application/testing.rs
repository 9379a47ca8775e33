//! 测试用 fakes：内存语料 API、计数合成器、记录型语音网关

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::ports::{
    BookRecord, ChapterRecord, PlaybackDispatcher, ScriptureApiError, ScriptureApiPort,
    SpeechSynthesizerPort, SynthesisError, VoiceChannelRef, VoiceError, VoiceGatewayPort,
    VoiceSession,
};
use crate::domain::scripture::{ChapterId, VerseId};
use crate::domain::speech::{AudioArtifact, AudioFormat, SynthesisRequest};
use crate::infrastructure::adapters::tts::persist_artifact;

// ============================================================================
// Scripture API
// ============================================================================

#[derive(Debug, Clone)]
struct FakeChapter {
    id: String,
    number: String,
    verses: Vec<(VerseId, String)>,
}

#[derive(Debug, Clone)]
struct FakeBook {
    id: String,
    name: String,
    chapters: Vec<FakeChapter>,
}

#[derive(Default)]
struct FakeScriptureState {
    books: Mutex<Vec<FakeBook>>,
    failing: AtomicBool,
    verse_list_calls: AtomicUsize,
    verse_text_calls: AtomicUsize,
}

/// 内存语料 API；clone 共享状态
#[derive(Clone, Default)]
pub struct FakeScriptureApi {
    state: Arc<FakeScriptureState>,
}

impl FakeScriptureApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn chapter(&self, book_id: &str, book_name: &str, chapter_id: String, number: String) {
        let mut books = self.state.books.lock().unwrap();
        let book = match books.iter().position(|b| b.id == book_id) {
            Some(i) => &mut books[i],
            None => {
                books.push(FakeBook {
                    id: book_id.to_string(),
                    name: book_name.to_string(),
                    chapters: Vec::new(),
                });
                books.last_mut().unwrap()
            }
        };
        if !book.chapters.iter().any(|c| c.id == chapter_id) {
            book.chapters.push(FakeChapter {
                id: chapter_id,
                number,
                verses: Vec::new(),
            });
        }
    }

    pub fn with_verse(
        self,
        book_id: &str,
        book_name: &str,
        chapter: u32,
        verse: u32,
        text: &str,
    ) -> Self {
        let chapter_id = format!("{}.{}", book_id, chapter);
        self.chapter(book_id, book_name, chapter_id.clone(), chapter.to_string());

        let mut books = self.state.books.lock().unwrap();
        let target = books
            .iter_mut()
            .flat_map(|b| b.chapters.iter_mut())
            .find(|c| c.id == chapter_id)
            .unwrap();
        target
            .verses
            .push((VerseId::new(format!("{}.{}", chapter_id, verse)), text.to_string()));
        drop(books);
        self
    }

    pub fn with_intro_chapter(self, book_id: &str, book_name: &str) -> Self {
        self.chapter(book_id, book_name, format!("{}.intro", book_id), "intro".to_string());
        self
    }

    pub fn with_empty_chapter(self, book_id: &str, book_name: &str, chapter: u32) -> Self {
        self.chapter(book_id, book_name, format!("{}.{}", book_id, chapter), chapter.to_string());
        self
    }

    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn verse_list_calls(&self) -> usize {
        self.state.verse_list_calls.load(Ordering::SeqCst)
    }

    pub fn verse_text_calls(&self) -> usize {
        self.state.verse_text_calls.load(Ordering::SeqCst)
    }

    pub fn verse_ids_of(&self, chapter_id: &str) -> Vec<VerseId> {
        self.state
            .books
            .lock()
            .unwrap()
            .iter()
            .flat_map(|b| b.chapters.iter())
            .find(|c| c.id == chapter_id)
            .map(|c| c.verses.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), ScriptureApiError> {
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(ScriptureApiError::NetworkError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScriptureApiPort for FakeScriptureApi {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, ScriptureApiError> {
        self.check()?;
        let books = self.state.books.lock().unwrap();
        Ok(books
            .iter()
            .map(|b| BookRecord {
                id: b.id.clone(),
                name: b.name.clone(),
                chapters: b
                    .chapters
                    .iter()
                    .map(|c| ChapterRecord {
                        id: c.id.clone(),
                        number: c.number.clone(),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn fetch_verse_list(
        &self,
        chapter: &ChapterId,
    ) -> Result<Vec<VerseId>, ScriptureApiError> {
        self.state.verse_list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.verse_ids_of(chapter.as_str()))
    }

    async fn fetch_verse_text(&self, verse: &VerseId) -> Result<String, ScriptureApiError> {
        self.state.verse_text_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let books = self.state.books.lock().unwrap();
        books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .flat_map(|c| c.verses.iter())
            .find(|(id, _)| id == verse)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| ScriptureApiError::ServiceError {
                status: 404,
                body: format!("verse {} not found", verse),
            })
    }
}

// ============================================================================
// Synthesizer
// ============================================================================

/// 计数合成器：写入确定性的伪 MP3 字节
#[derive(Default)]
pub struct CountingSynthesizer {
    calls: AtomicUsize,
    delay: Option<Duration>,
    failing: bool,
}

impl CountingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn audio_for(text: &str) -> Vec<u8> {
        format!("ID3:{}", text).into_bytes()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for CountingSynthesizer {
    fn provider(&self) -> &'static str {
        "counting"
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        output: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(SynthesisError::Rejected("invalid credentials".to_string()));
        }
        persist_artifact(output, &Self::audio_for(&request.text), AudioFormat::Mp3).await
    }
}

// ============================================================================
// Voice gateway
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Join(String),
    Play(PathBuf),
    Finished,
    Destroy,
    Disconnect,
}

#[derive(Clone, Default)]
struct RecordingOptions {
    fail_join: bool,
    fail_play: bool,
    fail_stream: bool,
    stream_duration: Option<Duration>,
}

/// 记录型语音网关：所有会话事件按顺序追加到同一列表
#[derive(Default)]
pub struct RecordingVoiceGateway {
    events: Arc<Mutex<Vec<VoiceEvent>>>,
    options: Arc<RecordingOptions>,
}

impl RecordingVoiceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn configure(mut self, f: impl FnOnce(&mut RecordingOptions)) -> Self {
        let mut options = (*self.options).clone();
        f(&mut options);
        self.options = Arc::new(options);
        self
    }

    pub fn failing_join(self) -> Self {
        self.configure(|o| o.fail_join = true)
    }

    pub fn failing_play(self) -> Self {
        self.configure(|o| o.fail_play = true)
    }

    pub fn failing_stream(self) -> Self {
        self.configure(|o| o.fail_stream = true)
    }

    /// 每次播放持续 `duration` 后才结束
    pub fn with_stream_duration(self, duration: Duration) -> Self {
        self.configure(|o| o.stream_duration = Some(duration))
    }

    /// 等到 `event` 至少出现 `n` 次（后台播放用）
    pub async fn wait_for(&self, event: &VoiceEvent, n: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while self.count(event) < n {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {:?} x{}, got {:?}",
                event,
                n,
                self.events()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub fn events(&self) -> Vec<VoiceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &VoiceEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    pub fn joins(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, VoiceEvent::Join(_)))
            .count()
    }
}

struct RecordingSession {
    channel: VoiceChannelRef,
    events: Arc<Mutex<Vec<VoiceEvent>>>,
    options: Arc<RecordingOptions>,
}

struct RecordingDispatcher {
    events: Arc<Mutex<Vec<VoiceEvent>>>,
    fail_stream: bool,
    stream_duration: Option<Duration>,
}

#[async_trait]
impl VoiceGatewayPort for RecordingVoiceGateway {
    async fn join(&self, channel: &VoiceChannelRef) -> Result<Box<dyn VoiceSession>, VoiceError> {
        self.events
            .lock()
            .unwrap()
            .push(VoiceEvent::Join(channel.to_string()));
        if self.options.fail_join {
            return Err(VoiceError::ConnectFailed {
                channel: channel.to_string(),
                reason: "gateway unavailable".to_string(),
            });
        }
        Ok(Box::new(RecordingSession {
            channel: channel.clone(),
            events: self.events.clone(),
            options: self.options.clone(),
        }))
    }
}

#[async_trait]
impl VoiceSession for RecordingSession {
    fn channel(&self) -> &VoiceChannelRef {
        &self.channel
    }

    async fn play(
        &mut self,
        artifact: &AudioArtifact,
    ) -> Result<Box<dyn PlaybackDispatcher>, VoiceError> {
        self.events
            .lock()
            .unwrap()
            .push(VoiceEvent::Play(artifact.path().to_path_buf()));
        if self.options.fail_play {
            return Err(VoiceError::PlayFailed("transport rejected".to_string()));
        }
        Ok(Box::new(RecordingDispatcher {
            events: self.events.clone(),
            fail_stream: self.options.fail_stream,
            stream_duration: self.options.stream_duration,
        }))
    }

    fn disconnect(&mut self) {
        self.events.lock().unwrap().push(VoiceEvent::Disconnect);
    }
}

#[async_trait]
impl PlaybackDispatcher for RecordingDispatcher {
    async fn finished(&mut self) -> Result<(), VoiceError> {
        if let Some(duration) = self.stream_duration {
            tokio::time::sleep(duration).await;
        }
        if self.fail_stream {
            return Err(VoiceError::StreamFailed("socket closed".to_string()));
        }
        self.events.lock().unwrap().push(VoiceEvent::Finished);
        Ok(())
    }

    fn destroy(&mut self) {
        self.events.lock().unwrap().push(VoiceEvent::Destroy);
    }
}
