//! WeakCache: key -> weak slot, cleaned up when values are reclaimed
//! WeakCache：键 -> 弱槽位，值被回收时自动清理
//!
//! # Locking
//! 锁
//!
//! - get / len: shared lock
//! - set / delete: exclusive lock
//! - lock order: store lock, then value hook lock (set only)
//! - no `Own` is dropped while the store lock is held, so a hook never
//!   re-enters a lock its thread already holds
//!
//! - get / len：共享锁
//! - set / delete：独占锁
//! - 加锁顺序：先存储锁，再值钩子锁（仅 set）
//! - 持有存储锁时不释放任何 `Own`，钩子不会重入本线程已持有的锁

use std::{
  borrow::Borrow,
  collections::HashMap,
  fmt::{self, Debug},
  hash::Hash,
  sync::Arc,
};

use log::{Log, kv::ToValue, trace};
use parking_lot::RwLock;

use crate::{
  Cacher, Own,
  own::Hook,
  sink::{self, NoLog, Sink},
  slot::Slot,
};

struct State<K, V> {
  map: HashMap<K, Slot<V>>,
  sink: Sink,
}

struct Store<K, V> {
  state: RwLock<State<K, V>>,
}

impl<K: Hash + Eq + ToValue, V> Store<K, V> {
  /// Run by a reclamation hook; removes the slot only if it is still the one
  /// the hook was armed for
  /// 由回收钩子调用；仅当槽位仍是该钩子对应的槽位时才移除
  fn delete(&self, key: &K, token: &Slot<V>) {
    let mut state = self.state.write();
    if state.map.get(key).is_some_and(|slot| slot.is(token)) {
      state.map.remove(key);
      sink::rm(&*state.sink, key);
    } else {
      trace!("stale hook {}", key.to_value());
    }
  }
}

impl<K, V> Drop for Store<K, V> {
  fn drop(&mut self) {
    // Disarm hooks still armed on live values, then release the owners
    // 解除存活值上仍武装的钩子，然后释放强引用
    let map = std::mem::take(&mut self.state.get_mut().map);
    let live: Vec<Own<V>> = map.into_values().filter_map(|slot| slot.disarm()).collect();
    drop(live);
  }
}

/// Concurrent cache of weak references
/// 弱引用并发缓存
///
/// The cache never keeps a value alive. When the last [`Own`] of a value is
/// dropped, the entry it was set under is removed and one `deleting key` event
/// goes to the sink. Clones share the same store.
///
/// 缓存从不延长值的生命周期。值的最后一个 [`Own`] 被释放时，对应条目被移除，
/// 并向接收器发送一条 `deleting key` 事件。克隆共享同一存储。
///
/// # Examples
/// ```
/// use weak_cache::{Own, WeakCache};
///
/// let cache: WeakCache<&str, String> = WeakCache::new();
/// let val = Own::new("value1".to_string());
/// cache.set("key1", &val);
/// assert_eq!(cache.get("key1").as_deref().map(String::as_str), Some("value1"));
///
/// drop(val);
/// assert!(cache.get("key1").is_none());
/// ```
pub struct WeakCache<K, V> {
  store: Arc<Store<K, V>>,
}

impl<K, V> WeakCache<K, V>
where
  K: Hash + Eq + Clone + ToValue + Send + Sync + 'static,
  V: Send + Sync + 'static,
{
  /// Create empty cache with discarding sink
  /// 创建空缓存，使用丢弃型接收器
  #[inline]
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  #[inline]
  pub fn with_capacity(cap: usize) -> Self {
    Self {
      store: Arc::new(Store {
        state: RwLock::new(State {
          map: HashMap::with_capacity(cap),
          sink: Arc::new(NoLog),
        }),
      }),
    }
  }

  /// Replace the event sink, meant for setup before sharing the cache
  /// 替换事件接收器，应在共享缓存前设置
  pub fn with_sink(self, sink: impl Log + 'static) -> Self {
    self.store.state.write().sink = Arc::new(sink);
    self
  }

  /// Get a strong owner if the key is set and its value is alive
  /// 键已设置且值存活时返回强引用
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<Own<V>>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.store.state.read().map.get(key).and_then(Slot::resolve)
  }

  /// Remember `val` under `key` and arm its reclamation hook
  /// 在 `key` 下记住 `val` 并武装其回收钩子
  pub fn set(&self, key: K, val: &Own<V>) {
    let prev = {
      let mut state = self.store.state.write();
      let slot = val.arm(|token| -> Hook {
        let store = Arc::downgrade(&self.store);
        let key = key.clone();
        Box::new(move || {
          if let Some(store) = store.upgrade() {
            store.delete(&key, &token);
          }
        })
      });
      state.map.insert(key, slot)
    };
    // Old owner may be the last one, drop it outside the store lock
    // 旧强引用可能是最后一个，须在存储锁外释放
    if let Some(prev) = prev {
      drop(prev.disarm());
    }
  }

  /// Slots currently stored
  /// 当前存储的槽位数
  #[inline]
  pub fn len(&self) -> usize {
    self.store.state.read().map.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.store.state.read().map.is_empty()
  }
}

impl<K, V> Default for WeakCache<K, V>
where
  K: Hash + Eq + Clone + ToValue + Send + Sync + 'static,
  V: Send + Sync + 'static,
{
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> Clone for WeakCache<K, V> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<K: Debug, V> Debug for WeakCache<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.store.state.read();
    f.debug_struct("WeakCache")
      .field("keys", &state.map.keys().collect::<Vec<_>>())
      .finish()
  }
}

impl<K, V> Cacher<K, V> for WeakCache<K, V>
where
  K: Hash + Eq + Clone + ToValue + Send + Sync + 'static,
  V: Send + Sync + 'static,
{
  #[inline]
  fn get(&self, key: &K) -> Option<Own<V>> {
    WeakCache::get(self, key)
  }

  #[inline]
  fn set(&self, key: K, val: &Own<V>) {
    WeakCache::set(self, key, val)
  }
}
