//! Weak slot: weak reference + id of the hook armed for it
//! 弱槽位：弱引用 + 为其武装的钩子 id

use std::sync::Weak;

use crate::own::{Own, Val};

/// Weak slot stored in the map, also the identity token captured by its hook
/// 存于映射中的弱槽位，同时也是其钩子捕获的身份令牌
pub(crate) struct Slot<V> {
  weak: Weak<Val<V>>,
  hook: u64,
}

impl<V> Slot<V> {
  #[inline]
  pub(crate) fn new(weak: Weak<Val<V>>, hook: u64) -> Self {
    Self { weak, hook }
  }

  #[cfg(test)]
  pub(crate) fn hook(&self) -> u64 {
    self.hook
  }

  /// Upgrade to a strong owner if the value is alive
  /// 值存活时升级为强引用
  #[inline]
  pub(crate) fn resolve(&self) -> Option<Own<V>> {
    self.weak.upgrade().map(Own::from_arc)
  }

  /// Same value instance and same hook
  /// 同一值实例且同一钩子
  #[inline]
  pub(crate) fn is(&self, token: &Self) -> bool {
    self.hook == token.hook && Weak::ptr_eq(&self.weak, &token.weak)
  }

  /// Disarm the hook on a live value.
  /// The returned owner must be dropped outside any cache lock, since it may
  /// be the last one and run other hooks.
  /// 解除存活值上的钩子。返回的强引用必须在缓存锁外释放，它可能是最后一个并触发其他钩子。
  pub(crate) fn disarm(&self) -> Option<Own<V>> {
    let own = self.resolve()?;
    own.disarm(self.hook);
    Some(own)
  }
}

impl<V> Clone for Slot<V> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      weak: Weak::clone(&self.weak),
      hook: self.hook,
    }
  }
}
