use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 按活动划分的抽签互斥锁
///
/// 同一活动同一时间只允许一个“生成 + 持久化”流程运行，
/// 不同活动互不阻塞。无人持有或等待的锁在下次 acquire 时回收。
#[derive(Default)]
pub struct DrawLocks {
    locks: Mutex<HashMap<i32, Arc<AsyncMutex<()>>>>,
}

impl DrawLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某活动的锁，持有返回的 guard 期间其他调用方等待
    pub async fn acquire(&self, event_id: i32) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // 只剩 map 自身引用的锁可以安全丢弃
            map.retain(|id, lock| *id == event_id || Arc::strong_count(lock) > 1);
            map.entry(event_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_event_is_serialized() {
        let locks = Arc::new(DrawLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tasks = (0..8).map(|_| {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_seen = max_seen.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(1).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            })
        });
        for result in futures_util::future::join_all(tasks).await {
            result.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_events_do_not_block() {
        let locks = DrawLocks::new();
        let _first = locks.acquire(1).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_idle_locks_are_pruned() {
        let locks = DrawLocks::new();
        let held = locks.acquire(1).await;
        drop(locks.acquire(2).await);
        drop(locks.acquire(3).await);

        let ids = |locks: &DrawLocks| {
            let mut ids: Vec<i32> = locks.locks.lock().unwrap().keys().copied().collect();
            ids.sort();
            ids
        };
        // 1 仍被持有，2 已空闲被回收，3 是刚刚使用的
        assert_eq!(ids(&locks), vec![1, 3]);

        drop(held);
        drop(locks.acquire(4).await);
        assert_eq!(ids(&locks), vec![4]);
    }
}
