//! Multi-thread tests / 多线程测试

use std::{
  sync::{
    Arc, Barrier,
    atomic::{AtomicUsize, Ordering},
  },
  thread,
};

use aok::{OK, Void};
use log::{Log, Metadata, Record, info};
use weak_cache::{Own, WeakCache};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

const THREADS: usize = 8;
const N: usize = 500;

/// Count events only
/// 仅计数事件
#[derive(Clone, Default)]
struct Count(Arc<AtomicUsize>);

impl Count {
  fn get(&self) -> usize {
    self.0.load(Ordering::SeqCst)
  }
}

impl Log for Count {
  fn enabled(&self, _: &Metadata) -> bool {
    true
  }

  fn log(&self, _: &Record) {
    self.0.fetch_add(1, Ordering::SeqCst);
  }

  fn flush(&self) {}
}

#[test]
fn test_disjoint_keys() -> Void {
  info!("> 测试多线程不相交键");

  let count = Count::default();
  let cache: WeakCache<usize, usize> = WeakCache::new().with_sink(count.clone());
  let barrier = Barrier::new(THREADS);

  thread::scope(|s| {
    for t in 0..THREADS {
      let cache = &cache;
      let barrier = &barrier;
      s.spawn(move || {
        barrier.wait();
        for i in 0..N {
          let key = t * N + i;
          let v = Own::new(key);
          cache.set(key, &v);
          assert_eq!(*cache.get(&key).unwrap(), key);
          drop(v);
          // Hook ran on this thread before drop returned
          // 钩子在 drop 返回前已在本线程运行
          assert!(cache.get(&key).is_none());
        }
      });
    }
  });

  assert!(cache.is_empty());
  assert_eq!(count.get(), THREADS * N);
  OK
}

#[test]
fn test_shared_keys_overwrite() -> Void {
  info!("> 测试多线程共享键覆盖");

  let count = Count::default();
  let cache: WeakCache<usize, (usize, usize)> = WeakCache::new().with_sink(count.clone());
  let barrier = Barrier::new(THREADS);

  thread::scope(|s| {
    for t in 0..THREADS {
      let cache = &cache;
      let barrier = &barrier;
      s.spawn(move || {
        barrier.wait();
        let mut held = Vec::new();
        for i in 0..N {
          let v = Own::new((t, i));
          cache.set(i % 16, &v);
          // Whatever is returned is alive while we hold it
          // 返回的值在持有期间必然存活
          if let Some(got) = cache.get(&(i % 16)) {
            assert!(got.1 < N);
          }
          held.push(v);
          if held.len() > 4 {
            held.remove(0);
          }
        }
      });
    }
  });

  // All owners dropped, every last installed slot was cleaned by its own hook
  // 所有强引用已释放，每个最后安装的槽位都由自身钩子清理
  assert!(cache.is_empty());
  assert!(count.get() <= THREADS * N);
  assert!(count.get() >= 16);
  OK
}

#[test]
fn test_readers_while_dropping() -> Void {
  info!("> 测试读取与释放并发");

  let cache: WeakCache<usize, Vec<u8>> = WeakCache::new();
  let vals: Vec<_> = (0..N).map(|i| Own::new(vec![i as u8; 8])).collect();
  for (i, v) in vals.iter().enumerate() {
    cache.set(i, v);
  }

  let hits = AtomicUsize::new(0);
  thread::scope(|s| {
    for _ in 0..THREADS {
      let cache = &cache;
      let hits = &hits;
      s.spawn(move || {
        for round in 0..4 {
          for i in 0..N {
            if let Some(v) = cache.get(&i) {
              assert_eq!(v[0], i as u8);
              hits.fetch_add(1, Ordering::Relaxed);
            }
          }
          if round == 0 {
            thread::yield_now();
          }
        }
      });
    }
    s.spawn(move || {
      for v in vals {
        drop(v);
      }
    });
  });

  info!("hits {}", hits.load(Ordering::Relaxed));
  assert!(cache.is_empty());
  OK
}

#[test]
fn test_clone_across_threads() -> Void {
  info!("> 测试跨线程克隆");

  let count = Count::default();
  let cache: WeakCache<String, String> = WeakCache::new().with_sink(count.clone());
  let v = Own::new("shared".to_string());
  cache.set("k".into(), &v);

  let handles: Vec<_> = (0..THREADS)
    .map(|_| {
      let cache = cache.clone();
      let v = v.clone();
      thread::spawn(move || {
        assert!(Own::ptr_eq(&cache.get("k").unwrap(), &v));
      })
    })
    .collect();
  for h in handles {
    h.join().unwrap();
  }

  // Last owner dropped on this thread
  // 最后一个强引用在本线程释放
  drop(v);
  assert!(cache.get("k").is_none());
  assert_eq!(count.get(), 1);
  OK
}
