//! Cacher trait definition
//! 缓存 trait 定义

use crate::Own;

/// Cache of shared values handed out as strong owners
/// 以强引用句柄提供共享值的缓存
///
/// `get` returning `None` covers both "never set" and "set but reclaimed".
/// `get` 返回 `None` 同时涵盖"从未设置"和"设置后已回收"。
pub trait Cacher<K, V> {
  /// Get value by key
  /// 按键获取值
  fn get(&self, key: &K) -> Option<Own<V>>;

  /// Remember value under key without owning it
  /// 在键下记住值，但不持有它
  fn set(&self, key: K, val: &Own<V>);
}
