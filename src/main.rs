//! BibleBot - 随机经文聊天机器人
//!
//! 启动流程：配置 → 日志 → 缓存目录 → 语料索引 → 合成/播放适配器 → HTTP 网关

use std::sync::Arc;

use biblebot::application::{
    load_corpus, BotMessages, CommandDispatcher, CommandSet, CorpusLoadOptions, InFlightPort,
    JoinAndSpeakHandler, PlaybackOrchestrator, RandomVerseHandler, SpeechPipeline,
    SpeechSynthesizerPort, VerseSampler, VoiceProfile,
};
use biblebot::config::{load_config, print_config, AppConfig, TtsProviderKind};
use biblebot::infrastructure::adapters::{
    ApiBibleClient, ApiBibleConfig, AzureSpeechClient, AzureSpeechConfig, FakeTtsClient,
    FakeTtsClientConfig, FileArtifactCache, GoogleTranslateTtsClient, GoogleTranslateTtsConfig,
    NeuralSynthesizer, PlayerVoiceConfig, PlayerVoiceGateway, SimpleSynthesizer,
};
use biblebot::infrastructure::http::{AppState, HttpServer, ServerConfig};
use biblebot::infrastructure::InFlightRegistry;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},biblebot={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置选择合成 provider
fn build_synthesizer(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechSynthesizerPort>> {
    let tts = &config.tts;
    let synthesizer: Arc<dyn SpeechSynthesizerPort> = match tts.provider {
        TtsProviderKind::Google => {
            let client = GoogleTranslateTtsClient::new(
                GoogleTranslateTtsConfig::new(&tts.google_url)
                    .with_timeout(tts.timeout_secs)
                    .with_chunk_chars(tts.chunk_chars),
            )?;
            Arc::new(SimpleSynthesizer::new(client))
        }
        TtsProviderKind::Azure => {
            let client = AzureSpeechClient::new(
                AzureSpeechConfig::new(&tts.azure_region, &tts.azure_key)
                    .with_timeout(tts.timeout_secs),
            )?;
            Arc::new(NeuralSynthesizer::new(client))
        }
        TtsProviderKind::Fake => {
            let audio_file_path = tts
                .fake_audio_path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("tts.fake_audio_path is not set"))?;
            let client =
                FakeTtsClient::new(FakeTtsClientConfig::new(audio_file_path, tts.fake_format))?;
            Arc::new(SimpleSynthesizer::new(client))
        }
    };
    Ok(synthesizer)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本地开发时从 .env 读取密钥
    dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("BibleBot starting");
    print_config(&config);

    // 语料索引：启动时加载一次，失败则退出
    let api = Arc::new(ApiBibleClient::new(
        ApiBibleConfig::new(
            &config.scripture.url,
            &config.scripture.api_key,
            &config.scripture.bible_id,
        )
        .with_timeout(config.scripture.timeout_secs),
    )?);
    let corpus = load_corpus(
        &*api,
        &CorpusLoadOptions {
            preload_verses: config.scripture.preload_verses,
            preload_concurrency: config.scripture.preload_concurrency,
        },
    )
    .await?;
    let chapter_count = corpus.chapter_count();

    let mut sampler = VerseSampler::new(api, Arc::new(corpus), config.bot.sampling);
    if let Some(seed) = config.bot.seed {
        sampler = sampler.with_seed(seed);
    }
    let sampler = Arc::new(sampler);

    // 合成 + 缓存（缓存目录在此创建）
    let synthesizer = build_synthesizer(&config)?;
    let artifact_cache = Arc::new(
        FileArtifactCache::new(&config.cache.dir, synthesizer.format(), config.cache.fingerprint)
            .await?,
    );

    let mut pipeline = SpeechPipeline::new(artifact_cache.clone(), synthesizer);
    let inflight: Option<Arc<dyn InFlightPort>> = if config.cache.collapse_inflight {
        let registry: Arc<dyn InFlightPort> = Arc::new(InFlightRegistry::new());
        pipeline = pipeline.with_inflight(registry.clone());
        Some(registry)
    } else {
        None
    };

    // 播放
    let gateway = Arc::new(PlayerVoiceGateway::new(PlayerVoiceConfig {
        player: config.voice.player.clone(),
    }));
    let orchestrator = Arc::new(PlaybackOrchestrator::new(gateway));

    let dispatcher = CommandDispatcher::new(
        CommandSet {
            verse_command: config.bot.verse_command.clone(),
            join_command: config.bot.join_command.clone(),
        },
        BotMessages {
            not_in_channel: config.bot.not_in_channel.clone(),
            generic_failure: config.bot.generic_failure.clone(),
        },
        RandomVerseHandler::new(sampler.clone(), config.bot.with_citation),
        JoinAndSpeakHandler::new(
            sampler,
            Arc::new(pipeline),
            orchestrator,
            VoiceProfile {
                language: config.tts.language.clone(),
                voice: config.tts.voice.clone(),
            },
        ),
    );

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(Arc::new(dispatcher), artifact_cache, inflight, chapter_count);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
