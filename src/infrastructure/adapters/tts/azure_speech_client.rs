//! Azure Speech Client - neural 模式 provider
//!
//! 外部 API:
//! POST https://{region}.tts.speech.microsoft.com/cognitiveservices/v1
//! Headers: Ocp-Apim-Subscription-Key, X-Microsoft-OutputFormat
//! Request: SSML (application/ssml+xml)
//! Response: audio/wav binary
//!
//! 每次 speak 在后台任务中发请求，完成后通过回调报告 ResultReason

use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{CallbackSynthesizer, NeuralTtsProvider, SynthesisCallback, SynthesisResult};
use crate::application::ports::SynthesisError;
use crate::domain::speech::{AudioFormat, SynthesisRequest};

/// Azure Speech 配置
#[derive(Debug, Clone)]
pub struct AzureSpeechConfig {
    /// 服务区域，如 `westeurope`
    pub region: String,
    pub subscription_key: String,
    /// 覆盖默认端点（私有部署、测试）
    pub endpoint: Option<String>,
    /// 默认音色（请求未指定时使用）
    pub default_voice: String,
    pub output_format: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for AzureSpeechConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            subscription_key: String::new(),
            endpoint: None,
            default_voice: "de-DE-KatjaNeural".to_string(),
            output_format: "riff-24khz-16bit-mono-pcm".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AzureSpeechConfig {
    pub fn new(region: impl Into<String>, subscription_key: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            subscription_key: subscription_key.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            )
        })
    }
}

/// Azure Speech 客户端
pub struct AzureSpeechClient {
    client: Client,
    config: AzureSpeechConfig,
}

impl AzureSpeechClient {
    pub fn new(config: AzureSpeechConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

impl NeuralTtsProvider for AzureSpeechClient {
    fn name(&self) -> &'static str {
        "azure"
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    fn create_synthesizer(
        &self,
        request: &SynthesisRequest,
    ) -> Result<Box<dyn CallbackSynthesizer>, SynthesisError> {
        if self.config.subscription_key.is_empty() {
            return Err(SynthesisError::Rejected("missing subscription key".to_string()));
        }

        let voice = if request.voice.is_empty() {
            self.config.default_voice.clone()
        } else {
            request.voice.clone()
        };

        Ok(Box::new(AzureSynthesizer {
            client: self.client.clone(),
            endpoint: self.config.endpoint(),
            subscription_key: self.config.subscription_key.clone(),
            output_format: self.config.output_format.clone(),
            language: request.language.clone(),
            voice,
            task: None,
        }))
    }
}

/// 一次性的 Azure 合成器
struct AzureSynthesizer {
    client: Client,
    endpoint: String,
    subscription_key: String,
    output_format: String,
    language: String,
    voice: String,
    task: Option<JoinHandle<()>>,
}

impl CallbackSynthesizer for AzureSynthesizer {
    fn speak_text_async(&mut self, text: &str, on_result: SynthesisCallback) {
        let ssml = build_ssml(&self.language, &self.voice, text);
        let request = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("X-Microsoft-OutputFormat", &self.output_format)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header(reqwest::header::USER_AGENT, "biblebot")
            .body(ssml);

        tracing::debug!(
            endpoint = %self.endpoint,
            voice = %self.voice,
            "Sending Azure TTS request"
        );

        self.task = Some(tokio::spawn(async move {
            let result = match request.send().await {
                Ok(response) if response.status().is_success() => match response.bytes().await {
                    Ok(bytes) => SynthesisResult::completed(bytes.to_vec()),
                    Err(e) => SynthesisResult::canceled(format!("Failed to read audio: {}", e)),
                },
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    SynthesisResult::canceled(format!("HTTP {}: {}", status, body))
                }
                Err(e) => SynthesisResult::canceled(e.to_string()),
            };
            on_result(result);
        }));
    }

    fn close(&mut self) {
        // 正常完成时任务已结束，abort 无副作用
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// 构造 SSML，文本做 XML 转义
fn build_ssml(language: &str, voice: &str, text: &str) -> String {
    format!(
        concat!(
            "<speak version='1.0' xml:lang='{lang}'>",
            "<voice xml:lang='{lang}' name='{voice}'>{text}</voice>",
            "</speak>"
        ),
        lang = xml_escape(language),
        voice = xml_escape(voice),
        text = xml_escape(text),
    )
}

fn xml_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SpeechSynthesizerPort;
    use crate::infrastructure::adapters::tts::NeuralSynthesizer;
    use tempfile::tempdir;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AzureSpeechClient {
        AzureSpeechClient::new(
            AzureSpeechConfig::new("westeurope", "secret")
                .with_endpoint(format!("{}/cognitiveservices/v1", server.uri()))
                .with_timeout(5),
        )
        .unwrap()
    }

    #[test]
    fn test_default_endpoint_uses_region() {
        let config = AzureSpeechConfig::new("westeurope", "key");
        assert_eq!(
            config.endpoint(),
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn test_ssml_escapes_text() {
        let ssml = build_ssml("de-DE", "de-DE-KatjaNeural", "Brot & Wein <heilig>");
        assert!(ssml.contains("Brot &amp; Wein &lt;heilig&gt;"));
        assert!(ssml.contains("name='de-DE-KatjaNeural'"));
        assert!(ssml.contains("xml:lang='de-DE'"));
    }

    #[tokio::test]
    async fn test_synthesize_writes_wav() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cognitiveservices/v1"))
            .and(header("Ocp-Apim-Subscription-Key", "secret"))
            .and(header("X-Microsoft-OutputFormat", "riff-24khz-16bit-mono-pcm"))
            .and(body_string_contains("Brot &amp; Wein"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFFdata".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let output = dir.path().join("a.wav");
        let synth = NeuralSynthesizer::new(client(&server));

        let artifact = synth
            .synthesize(&SynthesisRequest::new("Brot & Wein", "de-DE", ""), &output)
            .await
            .unwrap();
        assert_eq!(artifact.format(), AudioFormat::Wav);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"RIFFdata");
    }

    #[tokio::test]
    async fn test_unauthorized_is_canceled_with_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let synth = NeuralSynthesizer::new(client(&server));

        let result = synth
            .synthesize(&SynthesisRequest::new("Amen", "de-DE", ""), &dir.path().join("a.wav"))
            .await;
        assert!(matches!(
            result,
            Err(SynthesisError::Canceled { ref detail, .. }) if detail.contains("401")
        ));
    }

    #[test]
    fn test_missing_key_rejected() {
        let client = AzureSpeechClient::new(AzureSpeechConfig::new("westeurope", "")).unwrap();
        let result = client.create_synthesizer(&SynthesisRequest::new("Amen", "de-DE", ""));
        assert!(matches!(result, Err(SynthesisError::Rejected(_))));
    }
}
