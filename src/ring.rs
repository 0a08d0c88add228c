//! Core ring buffer implementation - fixed slots plus the SPSC publication protocol
//!
//! 核心环形缓冲区实现 - 固定槽位与 SPSC 发布协议
//!
//! `RingBuffer<T, CAPACITY>` owns `CAPACITY` slots and two cyclic indices:
//! - `head`: next slot to consume, written only by the consumer
//! - `tail`: next slot to fill, written only by the producer
//!
//! A slot is live iff it lies in the cyclic interval `[head, tail)`. One slot is always kept
//! free so that `head == tail` unambiguously means empty, which leaves `CAPACITY - 1` usable slots.
//!
//! `RingBuffer<T, CAPACITY>` 持有 `CAPACITY` 个槽位和两个循环索引：
//! - `head`：下一个待消费的槽位，仅由消费者写入
//! - `tail`：下一个待填充的槽位，仅由生产者写入
//!
//! 槽位存活当且仅当它位于循环区间 `[head, tail)` 内。始终保留一个空槽位，
//! 使 `head == tail` 明确表示空，因此可用容量为 `CAPACITY - 1`。

use crate::error::PushError;
use crate::shim::atomic::{AtomicUsize, Ordering};
use crate::slots::Slots;
use crate::spsc::{Consumer, Producer};
use crossbeam_utils::CachePadded;
use std::fmt;

/// Bounded, wait-free SPSC ring buffer with inline storage
///
/// 有界、无等待、内联存储的 SPSC 环形缓冲区
///
/// # Type Parameters
/// - `T`: Element type
/// - `CAPACITY`: Number of slots (must be ≥ 2); usable capacity is `CAPACITY - 1`
///
/// # 类型参数
/// - `T`: 元素类型
/// - `CAPACITY`: 槽位数量（必须 ≥ 2）；可用容量为 `CAPACITY - 1`
///
/// With `&mut self` the buffer can be driven directly from one thread. To move elements
/// between two threads, [`split`](RingBuffer::split) it into a [`Producer`] and a [`Consumer`].
///
/// 持有 `&mut self` 时可以在单个线程中直接操作缓冲区。若要在两个线程之间传递元素，
/// 请通过 [`split`](RingBuffer::split) 拆分为 [`Producer`] 和 [`Consumer`]。
///
/// # Examples
///
/// ```
/// use staticring::RingBuffer;
///
/// let mut buffer = RingBuffer::<i32, 4>::new();
/// assert_eq!(buffer.capacity(), 3);
///
/// assert!(buffer.try_push(1).is_ok());
/// assert!(buffer.try_push(2).is_ok());
/// assert!(buffer.try_push(3).is_ok());
/// assert!(buffer.try_push(4).is_err());
///
/// assert_eq!(buffer.try_pop(), Some(1));
/// assert!(buffer.try_push(4).is_ok());
/// assert_eq!(buffer.try_pop(), Some(2));
/// assert_eq!(buffer.try_pop(), Some(3));
/// assert_eq!(buffer.try_pop(), Some(4));
/// assert_eq!(buffer.try_pop(), None);
/// ```
pub struct RingBuffer<T, const CAPACITY: usize> {
    /// Slot storage, on its own cache line(s)
    ///
    /// 槽位存储，独占缓存行
    slots: CachePadded<Slots<T, CAPACITY>>,

    /// Consumer-owned read index
    ///
    /// 消费者拥有的读索引
    head: CachePadded<AtomicUsize>,

    /// Producer-owned write index
    ///
    /// 生产者拥有的写索引
    tail: CachePadded<AtomicUsize>,
}

impl<T, const CAPACITY: usize> RingBuffer<T, CAPACITY> {
    /// Number of elements the buffer can hold at once
    ///
    /// 缓冲区同时可容纳的元素数量
    pub const USABLE: usize = {
        assert!(CAPACITY >= 2, "RingBuffer capacity must be at least 2");
        CAPACITY - 1
    };

    /// Create an empty ring buffer
    ///
    /// 创建空的环形缓冲区
    ///
    /// No element is constructed and nothing is allocated on the heap.
    ///
    /// 不构造任何元素，也不进行堆分配。
    pub fn new() -> Self {
        // Forces the capacity check at monomorphization time
        let _ = Self::USABLE;

        Self {
            slots: CachePadded::new(Slots::new()),
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Get the usable capacity (`CAPACITY - 1`)
    ///
    /// 获取可用容量（`CAPACITY - 1`）
    #[inline]
    pub const fn capacity(&self) -> usize {
        Self::USABLE
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        head == tail
    }

    /// Check if the buffer is full
    ///
    /// 检查缓冲区是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        Self::increment(tail) == head
    }

    /// Get the approximate number of elements in the buffer
    ///
    /// 获取缓冲区中元素数量的近似值
    ///
    /// While the other side is active the result may already be stale when it is returned.
    /// Use it for diagnostics only, never to decide whether a push or pop will succeed.
    ///
    /// 当另一端正在操作时，返回值可能已经过时。仅用于诊断，
    /// 不要据此判断 push 或 pop 是否会成功。
    #[inline]
    pub fn size_approx(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        Self::distance(head, tail)
    }

    /// Push a value into the buffer
    ///
    /// 向缓冲区推送一个值
    ///
    /// # Errors
    /// Returns `PushError::Full` with the value if the buffer is full
    ///
    /// # 错误
    /// 如果缓冲区满则返回携带该值的 `PushError::Full`
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), PushError<T>> {
        unsafe { self.push_raw(value) }
    }

    /// Construct a value in place from `f`
    ///
    /// 通过 `f` 原地构造一个值
    ///
    /// `f` runs only after the full check has passed.
    ///
    /// 仅在满检查通过后才会调用 `f`。
    ///
    /// # Errors
    /// Returns `PushError::Full` with the unused closure if the buffer is full
    ///
    /// # 错误
    /// 如果缓冲区满则返回携带未调用闭包的 `PushError::Full`
    #[inline]
    pub fn try_emplace<F>(&mut self, f: F) -> Result<(), PushError<F>>
    where
        F: FnOnce() -> T,
    {
        unsafe { self.emplace_raw(f) }
    }

    /// Pop the oldest value from the buffer
    ///
    /// 从缓冲区弹出最早的值
    ///
    /// Returns `None` if the buffer is empty.
    ///
    /// 如果缓冲区为空则返回 `None`。
    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        unsafe { self.pop_raw() }
    }

    /// Peek at the oldest value without removing it
    ///
    /// 查看最早的值但不移除它
    ///
    /// This is a consumer-side operation and takes `&mut self` like [`try_pop`](Self::try_pop),
    /// so the returned reference is never shared with another thread.
    ///
    /// 这是消费者端操作，与 [`try_pop`](Self::try_pop) 一样需要 `&mut self`，
    /// 因此返回的引用不会被其他线程共享。
    #[inline]
    pub fn front(&mut self) -> Option<&T> {
        unsafe { self.front_raw() }
    }

    /// Split the buffer into its producer and consumer halves
    ///
    /// 将缓冲区拆分为生产者端和消费者端
    ///
    /// The halves borrow the buffer, so no allocation takes place. Each half is `Send` for
    /// `T: Send` and can be moved into its own scoped thread.
    ///
    /// 两端借用缓冲区，因此不会发生分配。当 `T: Send` 时两端均为 `Send`，
    /// 可以分别移动到各自的作用域线程中。
    ///
    /// # Examples
    ///
    /// ```
    /// use staticring::RingBuffer;
    /// use std::thread;
    ///
    /// let mut buffer = RingBuffer::<u32, 16>::new();
    /// let (mut producer, mut consumer) = buffer.split();
    ///
    /// thread::scope(|s| {
    ///     s.spawn(move || {
    ///         for i in 0..100 {
    ///             while producer.try_push(i).is_err() {
    ///                 thread::yield_now();
    ///             }
    ///         }
    ///     });
    ///
    ///     let mut expected = 0;
    ///     while expected < 100 {
    ///         if let Some(value) = consumer.try_pop() {
    ///             assert_eq!(value, expected);
    ///             expected += 1;
    ///         }
    ///     }
    /// });
    /// ```
    pub fn split(&mut self) -> (Producer<&Self>, Consumer<&Self>) {
        tracing::debug!(
            capacity = Self::USABLE,
            element = std::any::type_name::<T>(),
            "splitting ring buffer into producer and consumer"
        );

        let shared: &Self = self;
        (Producer::new(shared), Consumer::new(shared))
    }

    /// Destroy every live element and reset both indices to zero
    ///
    /// 析构所有存活元素并将两个索引重置为零
    ///
    /// # Safety
    /// No producer or consumer operation may run concurrently with this call.
    ///
    /// # 安全性
    /// 调用期间不得有任何生产者或消费者操作并发执行。
    pub unsafe fn clear_unsafe(&self) {
        let dropped = unsafe { self.drop_live() };
        self.head.store(0, Ordering::Relaxed);
        self.tail.store(0, Ordering::Relaxed);

        tracing::trace!(dropped, "cleared ring buffer");
    }

    /// Destroy every live element and reset the buffer to its initial state
    ///
    /// 析构所有存活元素并将缓冲区重置为初始状态
    pub fn clear(&mut self) {
        // `&mut self` rules out concurrent producer/consumer activity
        unsafe { self.clear_unsafe() }
    }

    /// Producer protocol: construct a value produced by `make` at `tail` and publish it.
    ///
    /// `make` receives `payload` only once the full check has passed. On failure the
    /// untouched payload is handed back.
    ///
    /// # Safety
    /// The caller must be the only producer.
    #[inline]
    unsafe fn publish_with<P>(
        &self,
        payload: P,
        make: impl FnOnce(P) -> T,
    ) -> Result<(), PushError<P>> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next_tail = Self::increment(tail);

        // Pairs with the consumer's release store on `head`
        if next_tail == self.head.load(Ordering::Acquire) {
            return Err(PushError::Full(payload));
        }

        unsafe {
            self.slots.write(tail, make(payload));
        }

        // Pairs with the consumer's acquire load on `tail`
        self.tail.store(next_tail, Ordering::Release);
        Ok(())
    }

    /// # Safety
    /// The caller must be the only producer.
    #[inline]
    pub(crate) unsafe fn push_raw(&self, value: T) -> Result<(), PushError<T>> {
        unsafe { self.publish_with(value, |value| value) }
    }

    /// # Safety
    /// The caller must be the only producer.
    #[inline]
    pub(crate) unsafe fn emplace_raw<F>(&self, f: F) -> Result<(), PushError<F>>
    where
        F: FnOnce() -> T,
    {
        unsafe { self.publish_with(f, |f| f()) }
    }

    /// Consumer protocol: move the value at `head` out and publish the freed slot.
    ///
    /// # Safety
    /// The caller must be the only consumer.
    #[inline]
    pub(crate) unsafe fn pop_raw(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);

        // Pairs with the producer's release store on `tail`
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        let value = unsafe { self.slots.take(head) };

        // Pairs with the producer's acquire load on `head`
        self.head.store(Self::increment(head), Ordering::Release);
        Some(value)
    }

    /// # Safety
    /// The caller must be the only consumer, and must not pop while the reference lives.
    #[inline]
    pub(crate) unsafe fn front_raw(&self) -> Option<&T> {
        let head = self.head.load(Ordering::Relaxed);

        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        unsafe { Some(self.slots.get(head)) }
    }

    /// Number of slots the producer may still fill.
    ///
    /// # Safety
    /// The caller must be the only producer.
    #[inline]
    pub(crate) unsafe fn free_raw(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        Self::USABLE - Self::distance(head, tail)
    }

    /// Destroy every element in `[head, tail)`, returning how many were destroyed.
    ///
    /// `head` is advanced past each slot before its destructor runs, so a panicking
    /// destructor never leaves a destroyed slot inside the live range. While unwinding,
    /// the remaining elements are still destroyed. On return `head == tail`.
    ///
    /// # Safety
    /// Requires exclusive access.
    unsafe fn drop_live(&self) -> usize {
        /// Finishes the drain if a destructor unwinds
        struct DrainGuard<'a, T, const CAPACITY: usize>(&'a RingBuffer<T, CAPACITY>);

        impl<T, const CAPACITY: usize> Drop for DrainGuard<'_, T, CAPACITY> {
            fn drop(&mut self) {
                unsafe { self.0.drop_live() };
            }
        }

        let tail = self.tail.load(Ordering::Relaxed);
        let live = Self::distance(self.head.load(Ordering::Relaxed), tail);

        if !std::mem::needs_drop::<T>() {
            self.head.store(tail, Ordering::Relaxed);
            return live;
        }

        loop {
            let head = self.head.load(Ordering::Relaxed);
            if head == tail {
                break;
            }
            self.head.store(Self::increment(head), Ordering::Relaxed);

            let guard = DrainGuard(self);
            unsafe { self.slots.drop_in_place(head) };
            std::mem::forget(guard);
        }

        live
    }

    #[inline(always)]
    const fn increment(index: usize) -> usize {
        let next = index + 1;
        if next == CAPACITY { 0 } else { next }
    }

    /// `(index + n) % CAPACITY` for `n <= CAPACITY`, without overflowing near `usize::MAX`
    #[inline(always)]
    const fn advance(index: usize, n: usize) -> usize {
        let until_wrap = CAPACITY - index;
        if n >= until_wrap { n - until_wrap } else { index + n }
    }

    #[inline(always)]
    const fn distance(head: usize, tail: usize) -> usize {
        if tail >= head {
            tail - head
        } else {
            CAPACITY - head + tail
        }
    }
}

/// Batch copy operations for Copy types
///
/// Copy 类型的批量拷贝操作
impl<T: Copy, const CAPACITY: usize> RingBuffer<T, CAPACITY> {
    /// Producer protocol for a whole slice, published with a single release store.
    ///
    /// # Safety
    /// The caller must be the only producer.
    pub(crate) unsafe fn push_slice_raw(&self, values: &[T]) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        let to_push = (Self::USABLE - Self::distance(head, tail)).min(values.len());
        if to_push == 0 {
            return 0;
        }

        unsafe {
            self.slots.copy_from_slice(tail, &values[..to_push]);
        }

        self.tail.store(Self::advance(tail, to_push), Ordering::Release);
        to_push
    }

    /// Consumer protocol for a whole slice, published with a single release store.
    ///
    /// # Safety
    /// The caller must be the only consumer.
    pub(crate) unsafe fn pop_slice_raw(&self, dest: &mut [T]) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        let to_pop = Self::distance(head, tail).min(dest.len());
        if to_pop == 0 {
            return 0;
        }

        unsafe {
            self.slots.copy_to_slice(head, &mut dest[..to_pop]);
        }

        self.head.store(Self::advance(head, to_pop), Ordering::Release);
        to_pop
    }
}

impl<T, const CAPACITY: usize> Default for RingBuffer<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAPACITY: usize> Drop for RingBuffer<T, CAPACITY> {
    fn drop(&mut self) {
        // Clean up any remaining elements in the buffer
        // 清理缓冲区中的剩余元素
        let dropped = unsafe { self.drop_live() };
        if dropped > 0 {
            tracing::trace!(dropped, "dropped live elements with ring buffer");
        }
    }
}

impl<T, const CAPACITY: usize> fmt::Debug for RingBuffer<T, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &Self::USABLE)
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .finish()
    }
}

// The slot handoff is synchronized by the release/acquire pairs on `head` and `tail`;
// each slot is accessed by at most one side at a time.
unsafe impl<T: Send, const CAPACITY: usize> Send for RingBuffer<T, CAPACITY> {}
unsafe impl<T: Send, const CAPACITY: usize> Sync for RingBuffer<T, CAPACITY> {}
