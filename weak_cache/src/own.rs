//! Strong owner with reclamation hooks
//! 带回收钩子的强引用持有者
//!
//! Rust has no tracing collector, so reclamation is modeled by reference
//! counting: the value lives in an `Arc` control block next to its armed hooks,
//! and dropping the last `Own` runs every hook still armed, exactly once, on the
//! dropping thread.
//!
//! Rust 没有追踪式 GC，回收由引用计数模拟：值与已武装的钩子同在 `Arc` 控制块中，
//! 最后一个 `Own` 被释放时，在释放线程上对每个仍武装的钩子恰好运行一次。

use std::{
  fmt,
  ops::Deref,
  sync::{Arc, Weak},
};

use parking_lot::Mutex;

use crate::slot::Slot;

/// Hook run once when the value is reclaimed
/// 值被回收时运行一次的钩子
pub(crate) type Hook = Box<dyn FnOnce() + Send>;

struct Hooks {
  next: u64,
  li: Vec<(u64, Hook)>,
}

/// Control block: value + armed hooks
/// 控制块：值 + 已武装钩子
pub(crate) struct Val<V> {
  val: V,
  hooks: Mutex<Hooks>,
}

impl<V> Drop for Val<V> {
  fn drop(&mut self) {
    // No Own is left, so no one can arm or disarm concurrently
    // 已无 Own，不存在并发武装或解除
    let li = std::mem::take(&mut self.hooks.get_mut().li);
    for (_, hook) in li {
      hook();
    }
  }
}

/// Strong handle to an externally owned value
/// 外部持有值的强引用句柄
///
/// Caches only keep weak references to the control block; the value is
/// reclaimed when the last `Own` clone is dropped.
/// 缓存只保存控制块的弱引用；最后一个 `Own` 克隆释放时值被回收。
pub struct Own<V>(Arc<Val<V>>);

impl<V> Own<V> {
  #[inline]
  pub fn new(val: V) -> Self {
    Self(Arc::new(Val {
      val,
      hooks: Mutex::new(Hooks {
        next: 0,
        li: Vec::new(),
      }),
    }))
  }

  /// Same value instance
  /// 是否同一个值实例
  #[inline]
  pub fn ptr_eq(this: &Self, other: &Self) -> bool {
    Arc::ptr_eq(&this.0, &other.0)
  }

  #[inline]
  pub fn strong_count(this: &Self) -> usize {
    Arc::strong_count(&this.0)
  }

  #[inline]
  pub(crate) fn from_arc(arc: Arc<Val<V>>) -> Self {
    Self(arc)
  }

  #[inline]
  pub(crate) fn downgrade(&self) -> Weak<Val<V>> {
    Arc::downgrade(&self.0)
  }

  /// Arm a hook built from its own slot token, return the token
  /// 用自身槽位令牌构建并武装钩子，返回令牌
  pub(crate) fn arm(&self, hook: impl FnOnce(Slot<V>) -> Hook) -> Slot<V> {
    let mut hooks = self.0.hooks.lock();
    let id = hooks.next;
    hooks.next += 1;
    let slot = Slot::new(self.downgrade(), id);
    hooks.li.push((id, hook(slot.clone())));
    slot
  }

  /// Remove an armed hook without running it
  /// 移除已武装钩子，不运行
  pub(crate) fn disarm(&self, id: u64) -> bool {
    let hook = {
      let mut hooks = self.0.hooks.lock();
      hooks
        .li
        .iter()
        .position(|(i, _)| *i == id)
        .map(|pos| hooks.li.swap_remove(pos))
    };
    // Captured key/store dropped outside the value lock
    // 捕获的键/存储在值锁外释放
    hook.is_some()
  }

  #[cfg(test)]
  pub(crate) fn armed(&self) -> usize {
    self.0.hooks.lock().li.len()
  }
}

impl<V> Clone for Own<V> {
  #[inline]
  fn clone(&self) -> Self {
    Self(Arc::clone(&self.0))
  }
}

impl<V> Deref for Own<V> {
  type Target = V;

  #[inline]
  fn deref(&self) -> &V {
    &self.0.val
  }
}

impl<V> AsRef<V> for Own<V> {
  #[inline]
  fn as_ref(&self) -> &V {
    &self.0.val
  }
}

impl<V> From<V> for Own<V> {
  #[inline]
  fn from(val: V) -> Self {
    Self::new(val)
  }
}

impl<V: fmt::Debug> fmt::Debug for Own<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(&self.0.val, f)
  }
}
