//! Process-wide memo of loaded shapes.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::shape::ShapeGraph;

/// Loaded shape graphs, keyed by type name.
///
/// Each type is loaded at most once: concurrent callers asking for a type that
/// is still loading wait for that load instead of starting their own. A failed
/// load leaves the entry empty, so the next caller retries.
#[derive(Debug, Default)]
pub struct ShapeCache {
    entries: DashMap<String, Arc<OnceCell<Arc<ShapeGraph>>>>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached shape of `type_name`, running `load` if there is none yet.
    ///
    /// A failed load does not leave an entry behind for `type_name`.
    pub async fn get_or_load<F, Fut, E>(
        &self,
        type_name: &str,
        load: F,
    ) -> Result<Arc<ShapeGraph>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ShapeGraph, E>>,
    {
        // The shard guard must not be held across the await below.
        let cell = self
            .entries
            .entry(type_name.to_owned())
            .or_default()
            .value()
            .clone();
        if let Some(shape) = cell.get() {
            debug!(type_name, "shape cache hit");
            return Ok(Arc::clone(shape));
        }
        let loaded = cell
            .get_or_try_init(|| async {
                debug!(type_name, "loading shape");
                load().await.map(Arc::new)
            })
            .await
            .map(Arc::clone);
        if loaded.is_err() {
            // Callers still waiting on the cell retry the load and clean up after themselves.
            self.entries.remove_if(type_name, |_, entry| {
                !entry.initialized() && Arc::strong_count(entry) <= 2
            });
        }
        loaded
    }

    /// The cached shape of `type_name`, if its load completed.
    pub fn get(&self, type_name: &str) -> Option<Arc<ShapeGraph>> {
        self.entries
            .get(type_name)
            .and_then(|cell| cell.get().cloned())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    /// The number of loaded shapes.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The types whose shape is loaded, sorted.
    pub fn cached_types(&self) -> Vec<String> {
        let mut types = self
            .entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        types.sort_unstable();
        types
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::shacl::ShapesGraph;

    fn empty_shape(type_name: &str) -> ShapeGraph {
        ShapeGraph::new(type_name, oxrdf::Dataset::new(), ShapesGraph::default())
    }

    #[tokio::test]
    async fn test_loads_once() -> Result<(), String> {
        let cache = ShapeCache::new();
        let loads = AtomicUsize::new(0);
        for _ in 0..3 {
            let shape = cache
                .get_or_load("Member", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(empty_shape("Member"))
                })
                .await?;
            assert_eq!(shape.type_name(), "Member");
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached_types(), ["Member"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = ShapeCache::new();
        let failed = cache
            .get_or_load("Member", || async { Err::<ShapeGraph, _>("unreachable") })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());
        assert!(!cache.contains("Member"));
        let loaded = cache
            .get_or_load("Member", || async { Ok::<_, &str>(empty_shape("Member")) })
            .await;
        assert!(loaded.is_ok());
        assert!(cache.contains("Member"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_loads_leave_no_entry() -> Result<(), String> {
        let cache = ShapeCache::new();
        for i in 0..100 {
            let failed = cache
                .get_or_load(&format!("Unknown{i}"), || async {
                    Err::<ShapeGraph, _>("not found")
                })
                .await;
            assert!(failed.is_err());
        }
        assert_eq!(cache.entries.len(), 0);
        cache
            .get_or_load("Member", || async { Ok::<_, &str>(empty_shape("Member")) })
            .await
            .map_err(str::to_owned)?;
        assert_eq!(cache.entries.len(), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_load() {
        let cache = Arc::new(ShapeCache::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let tasks = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                tokio::spawn(async move {
                    cache
                        .get_or_load("Member", || async move {
                            loads.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, String>(empty_shape("Member"))
                        })
                        .await
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            assert!(matches!(task.await, Ok(Ok(_))));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
