//! API.Bible Client - 调用 API.Bible REST 服务
//!
//! 实现 ScriptureApiPort trait
//!
//! 外部 API（header `api-key` 认证，响应统一包在 `data` 里）:
//! GET /bibles/{bibleId}/books?include-chapters=true
//! GET /bibles/{bibleId}/chapters/{chapterId}/verses
//! GET /bibles/{bibleId}/verses/{verseId}?content-type=text&include-verse-numbers=false&include-titles=false

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{BookRecord, ChapterRecord, ScriptureApiError, ScriptureApiPort};
use crate::domain::scripture::{ChapterId, VerseId};

/// API 响应外层
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct BookDto {
    id: String,
    name: String,
    #[serde(default)]
    chapters: Vec<ChapterDto>,
}

#[derive(Debug, Deserialize)]
struct ChapterDto {
    id: String,
    number: String,
}

#[derive(Debug, Deserialize)]
struct VerseRefDto {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VerseDto {
    content: String,
}

/// API.Bible 客户端配置
#[derive(Debug, Clone)]
pub struct ApiBibleConfig {
    /// API 基础 URL
    pub base_url: String,
    pub api_key: String,
    /// 译本 ID
    pub bible_id: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ApiBibleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.scripture.api.bible/v1".to_string(),
            api_key: String::new(),
            bible_id: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ApiBibleConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bible_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            bible_id: bible_id.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// API.Bible 客户端
pub struct ApiBibleClient {
    client: Client,
    config: ApiBibleConfig,
}

impl ApiBibleClient {
    pub fn new(config: ApiBibleConfig) -> Result<Self, ScriptureApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScriptureApiError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn bible_url(&self, path: &str) -> String {
        format!(
            "{}/bibles/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bible_id,
            path
        )
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ScriptureApiError> {
        tracing::debug!(url = %url, "Sending scripture API request");

        let response = self
            .client
            .get(url)
            .header("api-key", &self.config.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScriptureApiError::Timeout
                } else if e.is_connect() {
                    let msg = format!("Cannot connect to scripture API: {}", e);
                    ScriptureApiError::NetworkError(msg)
                } else {
                    ScriptureApiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScriptureApiError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ScriptureApiError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ScriptureApiPort for ApiBibleClient {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, ScriptureApiError> {
        let books: Vec<BookDto> = self
            .get_data(&self.bible_url("books"), &[("include-chapters", "true")])
            .await?;

        tracing::info!(
            bible_id = %self.config.bible_id,
            books = books.len(),
            "Fetched books"
        );

        Ok(books
            .into_iter()
            .map(|book| BookRecord {
                id: book.id,
                name: book.name,
                chapters: book
                    .chapters
                    .into_iter()
                    .map(|c| ChapterRecord {
                        id: c.id,
                        number: c.number,
                    })
                    .collect(),
            })
            .collect())
    }

    async fn fetch_verse_list(
        &self,
        chapter: &ChapterId,
    ) -> Result<Vec<VerseId>, ScriptureApiError> {
        let verses: Vec<VerseRefDto> = self
            .get_data(&self.bible_url(&format!("chapters/{}/verses", chapter)), &[])
            .await?;

        Ok(verses.into_iter().map(|v| VerseId::new(v.id)).collect())
    }

    async fn fetch_verse_text(&self, verse: &VerseId) -> Result<String, ScriptureApiError> {
        let dto: VerseDto = self
            .get_data(
                &self.bible_url(&format!("verses/{}", verse)),
                &[
                    ("content-type", "text"),
                    ("include-verse-numbers", "false"),
                    ("include-titles", "false"),
                ],
            )
            .await?;

        Ok(dto.content)
    }
}
