//! Scripture Adapter - 经文内容 API 客户端

mod api_bible_client;

pub use api_bible_client::{ApiBibleClient, ApiBibleConfig};
