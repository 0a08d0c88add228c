//! # Fixed-Capacity Wait-Free SPSC Ring Buffer
//!
//! 固定容量的无等待 SPSC 环形缓冲区
//!
//! `staticring` is a bounded, lock-free Single Producer Single Consumer (SPSC) ring buffer.
//! The storage lives inline in the buffer, so creating one never touches the heap, and
//! every operation completes in a bounded number of steps.
//!
//! `staticring` 是一个有界的单生产者单消费者（SPSC）无锁环形缓冲区。
//! 存储内联于缓冲区中，创建时不进行堆分配，且每个操作都在有限步骤内完成。
//!
//! ## Features
//!
//! 特性
//!
//! - **Wait-Free** - No locks, no spinning, no retries inside an operation
//! - **Allocation-Free** - `CAPACITY` slots stored inline, constructed and destroyed on demand
//! - **Any Element Type** - Values are moved in and out; destructors run exactly once
//! - **Minimal Ordering** - One acquire load and one release store per operation
//! - **No False Sharing** - Storage, head and tail sit on separate cache lines
//!
//! - **无等待** - 操作内部无锁、无自旋、无重试
//! - **无分配** - `CAPACITY` 个槽位内联存储，按需构造与析构
//! - **任意元素类型** - 值被移入移出，析构函数恰好执行一次
//! - **最小内存序** - 每个操作一次 acquire 读取和一次 release 写入
//! - **无伪共享** - 存储、head 和 tail 位于不同的缓存行
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! use staticring::RingBuffer;
//!
//! // 4 slots, one is always kept free: 3 usable
//! // 4 个槽位，始终保留一个空槽：可用 3 个
//! let mut buffer = RingBuffer::<i32, 4>::new();
//!
//! buffer.try_push(42).unwrap();
//! buffer.try_push(100).unwrap();
//!
//! assert_eq!(buffer.front(), Some(&42));
//! assert_eq!(buffer.try_pop(), Some(42));
//! assert_eq!(buffer.try_pop(), Some(100));
//! assert_eq!(buffer.try_pop(), None);
//! ```
//!
//! ## Multi-threaded Usage
//!
//! 多线程使用
//!
//! Split a buffer into a [`Producer`] and a [`Consumer`] and hand each to its own thread.
//! Owned, `'static` handles are available through [`spsc::channel`].
//!
//! 将缓冲区拆分为 [`Producer`] 和 [`Consumer`]，分别交给各自的线程。
//! 通过 [`spsc::channel`] 可以获得拥有所有权的 `'static` 句柄。
//!
//! ```rust
//! use staticring::spsc;
//! use std::thread;
//!
//! let (mut producer, mut consumer) = spsc::channel::<u64, 64>();
//!
//! // Producer thread
//! // 生产者线程
//! let producer_handle = thread::spawn(move || {
//!     for i in 0..1000 {
//!         while producer.try_push(i).is_err() {
//!             thread::yield_now();
//!         }
//!     }
//! });
//!
//! // Consumer thread
//! // 消费者线程
//! let consumer_handle = thread::spawn(move || {
//!     let mut received = Vec::new();
//!     while received.len() < 1000 {
//!         match consumer.try_pop() {
//!             Some(value) => received.push(value),
//!             None => thread::yield_now(),
//!         }
//!     }
//!     received
//! });
//!
//! producer_handle.join().unwrap();
//! let received = consumer_handle.join().unwrap();
//! assert!(received.iter().copied().eq(0..1000));
//! ```
//!
//! ## In-Place Construction
//!
//! 原地构造
//!
//! ```rust
//! use staticring::RingBuffer;
//!
//! let mut buffer = RingBuffer::<Vec<u8>, 2>::new();
//!
//! assert!(buffer.try_emplace(|| vec![0; 16]).is_ok());
//!
//! // Full: the closure is handed back without being called
//! // 已满：闭包未被调用即被返回
//! let rejected = buffer.try_emplace(|| vec![1; 16]).unwrap_err();
//! let value = (rejected.into_inner())();
//! assert_eq!(value, vec![1; 16]);
//! ```
//!
//! ## API Overview
//!
//! API 概览
//!
//! ### Producer Methods
//!
//! 生产者方法
//!
//! - `try_push(value)` - Push a single element
//! - `try_emplace(f)` - Construct a single element in place
//! - `push_slice(&[T])` - Push multiple elements (requires `T: Copy`)
//! - `is_full()` / `free_slots()` - Check available space
//!
//! - `try_push(value)` - 推送单个元素
//! - `try_emplace(f)` - 原地构造单个元素
//! - `push_slice(&[T])` - 批量推送多个元素（需要 `T: Copy`）
//! - `is_full()` / `free_slots()` - 检查可用空间
//!
//! ### Consumer Methods
//!
//! 消费者方法
//!
//! - `try_pop()` - Pop a single element
//! - `front()` - View first element without removing
//! - `pop_slice(&mut [T])` - Pop multiple elements (requires `T: Copy`)
//! - `drain()` - Create draining iterator
//! - `is_empty()` - Check if buffer is empty
//!
//! - `try_pop()` - 弹出单个元素
//! - `front()` - 查看第一个元素但不移除
//! - `pop_slice(&mut [T])` - 批量弹出多个元素（需要 `T: Copy`）
//! - `drain()` - 创建消费迭代器
//! - `is_empty()` - 检查缓冲区是否为空
//!
//! Both sides also offer `capacity()` and the racy `size_approx()`.
//!
//! 两端均提供 `capacity()` 以及非精确的 `size_approx()`。
//!
//! ## Notes
//!
//! 注意事项
//!
//! - Usable capacity is `CAPACITY - 1`; `CAPACITY` must be at least 2 (checked at compile time)
//! - Only supports Single Producer Single Consumer (SPSC) scenarios
//! - Remaining elements are dropped together with the buffer
//!
//! - 可用容量为 `CAPACITY - 1`；`CAPACITY` 必须至少为 2（编译期检查）
//! - 仅支持单生产者单消费者（SPSC）场景
//! - 剩余元素会随缓冲区一同被释放

mod error;
mod ring;
mod shim;
mod slots;
pub mod spsc;

pub use error::PushError;
pub use ring::RingBuffer;
pub use spsc::{Consumer, Drain, Producer};
