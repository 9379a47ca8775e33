//! Scripture Context - 经文语料限界上下文
//!
//! 职责:
//! - Book / Chapter / Verse 实体
//! - 启动时加载一次的只读语料索引（CorpusIndex）
//! - 引用（Citation）格式化

mod corpus;
mod entities;
mod errors;
mod value_objects;

pub use corpus::{ChapterEntry, CorpusIndex};
pub use entities::{Book, Chapter, SampledVerse, Verse};
pub use errors::ScriptureError;
pub use value_objects::{BookId, ChapterId, Citation, VerseId};
