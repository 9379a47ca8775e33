//! Speech Context - 语音合成限界上下文
//!
//! 职责:
//! - 合成请求（SynthesisRequest）值对象
//! - 内容指纹（Fingerprint）计算，作为音频缓存 key
//! - 音频产物（AudioArtifact）描述

mod fingerprint;
mod value_objects;

pub use fingerprint::{Fingerprint, FingerprintScope};
pub use value_objects::{AudioArtifact, AudioFormat, SynthesisRequest};
