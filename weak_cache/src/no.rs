//! NoCache - zero overhead no-op cache
//! NoCache - 零开销空操作缓存
//!
//! Useful for disabling the cache behind the same `Cacher` interface.
//! 用于在同一 `Cacher` 接口下禁用缓存。

use crate::{Cacher, Own};

/// No-op cache, all operations do nothing
/// 空操作缓存，所有操作都不做任何事
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl<K, V> Cacher<K, V> for NoCache {
  #[inline(always)]
  fn get(&self, _: &K) -> Option<Own<V>> {
    None
  }

  #[inline(always)]
  fn set(&self, _: K, _: &Own<V>) {}
}
