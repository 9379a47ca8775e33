//! In-Flight Port - 按指纹的合成互斥
//!
//! 同一指纹同时只允许一个合成在进行，其余请求等待后复用结果。
//! 具体实现在 infrastructure/memory 层

use async_trait::async_trait;

use crate::domain::speech::Fingerprint;

/// 持有期间独占该指纹；drop 即释放
pub struct InFlightGuard {
    _inner: Box<dyn Send + Sync>,
}

impl InFlightGuard {
    pub fn new(inner: impl Send + Sync + 'static) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

/// In-Flight Port
#[async_trait]
pub trait InFlightPort: Send + Sync {
    /// 进入指纹对应的临界区
    async fn enter(&self, fingerprint: &Fingerprint) -> InFlightGuard;

    /// 当前登记中的指纹数量
    fn in_flight(&self) -> usize;
}
