//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod scripture;
pub mod storage;
pub mod tts;
pub mod voice;

pub use scripture::*;
pub use storage::*;
pub use tts::{
    AzureSpeechClient, AzureSpeechConfig, FakeTtsClient, FakeTtsClientConfig,
    GoogleTranslateTtsClient, GoogleTranslateTtsConfig, NeuralSynthesizer, SimpleSynthesizer,
};
pub use voice::*;
