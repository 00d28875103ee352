//! Concurrent cache of weak references with drop-driven self cleanup
//! 弱引用并发缓存，值释放时自动清理
//!
//! Values are owned through [`Own`]. The cache stores weak slots only, so it
//! never extends a value's lifetime. Each [`WeakCache::set`] arms a hook on the
//! value; when the last `Own` is dropped the hook removes the entry and emits a
//! `deleting key` event to the configured [`log::Log`] sink.
//!
//! 值通过 [`Own`] 持有。缓存只存弱槽位，从不延长值的生命周期。每次
//! [`WeakCache::set`] 都在值上武装一个钩子；最后一个 `Own` 释放时，钩子移除条目，
//! 并向配置的 [`log::Log`] 接收器发送 `deleting key` 事件。
//!
//! # Features
//!
//! - `no`: [`NoCache`] - zero overhead no-op
//!
//! # Examples
//! ```
//! use weak_cache::{Cacher, Global, Own, WeakCache};
//!
//! let cache = WeakCache::new().with_sink(Global);
//! let v1 = Own::new("value1".to_string());
//! let v2 = Own::new("value2".to_string());
//! cache.set("key1".to_string(), &v1);
//! cache.set("key-2".to_string(), &v2);
//!
//! assert!(Own::ptr_eq(&Cacher::get(&cache, &"key1".to_string()).unwrap(), &v1));
//!
//! drop(v1);
//! drop(v2);
//! assert!(cache.get("key1").is_none());
//! assert!(cache.get("key-2").is_none());
//! assert!(cache.is_empty());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod own;
mod slot;
mod weak;

pub mod sink;

#[cfg(feature = "no")]
mod no;

pub use cache::Cacher;
#[cfg(feature = "no")]
pub use no::NoCache;
pub use own::Own;
pub use sink::{Global, NoLog, Sink};
pub use weak::WeakCache;
