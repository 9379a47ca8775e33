//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Scripture Context: 经文语料与抽样结果
//! - Speech Context: 合成请求、内容指纹、音频产物

pub mod scripture;
pub mod speech;

// 供 simple 模式 provider 使用的文本分块器
mod text_segmenter;

pub use text_segmenter::{chunk_text, ChunkConfig, DEFAULT_MAX_CHARS};
