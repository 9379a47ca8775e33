//! In-Flight Registry - 按指纹的合成互斥（内存实现）

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::ports::{InFlightGuard, InFlightPort};
use crate::domain::speech::Fingerprint;

/// 一个指纹的互斥锁及其登记数（持有者 + 等待者）
struct SlotEntry {
    lock: Arc<Mutex<()>>,
    users: usize,
}

type Slots = Arc<DashMap<Fingerprint, SlotEntry>>;

/// 内存 in-flight 登记表
///
/// fingerprint -> 互斥锁；最后一个登记者离开（释放或取消等待）时移除条目
#[derive(Default)]
pub struct InFlightRegistry {
    slots: Slots,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 一次登记；从开始等待起存在，drop 时释放锁并注销
struct Slot {
    slots: Slots,
    fingerprint: Fingerprint,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.guard.take();
        if let Entry::Occupied(mut entry) = self.slots.entry(self.fingerprint.clone()) {
            let slot = entry.get_mut();
            slot.users -= 1;
            if slot.users == 0 {
                entry.remove();
            }
        }
    }
}

#[async_trait]
impl InFlightPort for InFlightRegistry {
    async fn enter(&self, fingerprint: &Fingerprint) -> InFlightGuard {
        let lock = {
            let mut entry = self
                .slots
                .entry(fingerprint.clone())
                .or_insert_with(|| SlotEntry {
                    lock: Arc::new(Mutex::new(())),
                    users: 0,
                });
            entry.users += 1;
            entry.lock.clone()
        };

        // 等待被取消时 slot 随 future 一起 drop，登记数同样归还
        let mut slot = Slot {
            slots: self.slots.clone(),
            fingerprint: fingerprint.clone(),
            guard: None,
        };
        slot.guard = Some(lock.lock_owned().await);
        tracing::trace!(fingerprint = %fingerprint.short(), "Entered in-flight slot");

        InFlightGuard::new(slot)
    }

    fn in_flight(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::speech::{FingerprintScope, SynthesisRequest};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn fingerprint(text: &str) -> Fingerprint {
        Fingerprint::of(&SynthesisRequest::new(text, "de", ""), FingerprintScope::Text)
    }

    #[tokio::test]
    async fn test_entry_removed_after_release() {
        let registry = InFlightRegistry::new();
        let guard = registry.enter(&fingerprint("a")).await;
        assert_eq!(registry.in_flight(), 1);
        drop(guard);
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_same_fingerprint_is_exclusive() {
        let registry = Arc::new(InFlightRegistry::new());
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                let active = active.clone();
                let peak = peak.clone();
                tokio::spawn(async move {
                    let _guard = registry.enter(&fingerprint("same")).await;
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_is_unregistered() {
        let registry = InFlightRegistry::new();
        let fp = fingerprint("Amen");

        let holder = registry.enter(&fp).await;
        let mut waiter = registry.enter(&fp);
        assert!(futures_util::poll!(&mut waiter).is_pending());

        drop(holder);
        drop(waiter);
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_waiter_timing_out_keeps_holder_entry() {
        let registry = InFlightRegistry::new();
        let fp = fingerprint("Amen");

        let holder = registry.enter(&fp).await;
        let waited = tokio::time::timeout(Duration::from_millis(20), registry.enter(&fp)).await;
        assert!(waited.is_err());
        assert_eq!(registry.in_flight(), 1);

        drop(holder);
        assert_eq!(registry.in_flight(), 0);

        // 条目被移除后可以重新进入
        let again = tokio::time::timeout(Duration::from_millis(100), registry.enter(&fp)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_different_fingerprints_do_not_block() {
        let registry = InFlightRegistry::new();
        let _a = registry.enter(&fingerprint("a")).await;
        let b = tokio::time::timeout(Duration::from_millis(100), registry.enter(&fingerprint("b")))
            .await;
        assert!(b.is_ok());
        assert_eq!(registry.in_flight(), 2);
    }
}
