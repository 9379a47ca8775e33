//! Voice Adapter - 语音传输实现

mod player_voice_gateway;

pub use player_voice_gateway::{PlayerVoiceConfig, PlayerVoiceGateway};
