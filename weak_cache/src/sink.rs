//! Event sinks for reclamation notices
//! 回收通知的事件接收器
//!
//! Any `log::Log` works as a sink. Each reclaimed key produces one record:
//! level `Info`, message `deleting key`, field `key`.
//! 任意 `log::Log` 都可作为接收器。每个被回收的键产生一条记录：
//! 级别 `Info`，消息 `deleting key`，字段 `key`。

use std::sync::Arc;

use log::{Level, Log, Metadata, Record, kv::ToValue};

/// Shared sink, invoked from whichever thread drops a value
/// 共享接收器，可由任意释放值的线程调用
pub type Sink = Arc<dyn Log>;

/// Record target
/// 记录目标
pub const TARGET: &str = "weak_cache";

/// Message of the reclamation event
/// 回收事件的消息
pub const RM: &str = "deleting key";

/// Field carrying the reclaimed key
/// 携带被回收键的字段
pub const KEY: &str = "key";

/// Discard everything (default)
/// 丢弃所有事件（默认）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLog;

impl Log for NoLog {
  #[inline(always)]
  fn enabled(&self, _: &Metadata) -> bool {
    false
  }

  #[inline(always)]
  fn log(&self, _: &Record) {}

  #[inline(always)]
  fn flush(&self) {}
}

/// Forward to the process logger installed via `log`
/// 转发到通过 `log` 安装的进程日志器
#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

impl Log for Global {
  #[inline]
  fn enabled(&self, meta: &Metadata) -> bool {
    meta.level() <= log::max_level() && log::logger().enabled(meta)
  }

  #[inline]
  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      log::logger().log(record);
    }
  }

  #[inline]
  fn flush(&self) {
    log::logger().flush();
  }
}

/// Emit the `deleting key` event
/// 发出 `deleting key` 事件
pub(crate) fn rm<K: ToValue + ?Sized>(sink: &dyn Log, key: &K) {
  let meta = Metadata::builder().level(Level::Info).target(TARGET).build();
  if !sink.enabled(&meta) {
    return;
  }
  let kvs = [(KEY, key.to_value())];
  sink.log(
    &Record::builder()
      .metadata(meta)
      .args(format_args!("{RM}"))
      .module_path_static(Some(module_path!()))
      .key_values(&kvs)
      .build(),
  );
}
