//! Producer and consumer handles for the SPSC ring buffer
//!
//! SPSC 环形缓冲区的生产者与消费者句柄
//!
//! A [`RingBuffer`] has exactly one producer and one consumer. The handles encode that
//! contract in the type system: neither is `Clone`, and every operation takes `&mut self`,
//! so each role can only be exercised from one thread at a time.
//!
//! [`RingBuffer`] 恰好有一个生产者和一个消费者。句柄在类型系统中表达这一约定：
//! 两者都不可 `Clone`，且所有操作都需要 `&mut self`，因此每个角色同一时间只能在一个线程中使用。
//!
//! Handles come in two flavours:
//! - borrowed, from [`RingBuffer::split`] (no allocation, for scoped threads)
//! - owned, from [`channel`] (the buffer lives in an `Arc`, handles are `'static`)
//!
//! 句柄有两种形式：
//! - 借用形式，来自 [`RingBuffer::split`]（无分配，适用于作用域线程）
//! - 拥有形式，来自 [`channel`]（缓冲区位于 `Arc` 中，句柄为 `'static`）

use crate::error::PushError;
use crate::ring::RingBuffer;
use crate::shim::sync::Arc;
use std::cell::Cell;
use std::marker::PhantomData;
use std::ops::Deref;

/// Producer half of the ring buffer
///
/// 环形缓冲区的生产者端
///
/// # Type Parameters
/// - `R`: How the buffer is reached (`&RingBuffer` or `Arc<RingBuffer>`)
///
/// # 类型参数
/// - `R`: 访问缓冲区的方式（`&RingBuffer` 或 `Arc<RingBuffer>`）
#[derive(Debug)]
pub struct Producer<R> {
    ring: R,
    _not_sync: PhantomData<Cell<()>>,
}

/// Consumer half of the ring buffer
///
/// 环形缓冲区的消费者端
///
/// # Type Parameters
/// - `R`: How the buffer is reached (`&RingBuffer` or `Arc<RingBuffer>`)
///
/// # 类型参数
/// - `R`: 访问缓冲区的方式（`&RingBuffer` 或 `Arc<RingBuffer>`）
#[derive(Debug)]
pub struct Consumer<R> {
    ring: R,
    // `front` hands out `&T`; sharing the handle would share that reference across threads
    _not_sync: PhantomData<Cell<()>>,
}

/// Producer half returned by [`channel`]
///
/// [`channel`] 返回的生产者端
pub type OwnedProducer<T, const CAPACITY: usize> = Producer<Arc<RingBuffer<T, CAPACITY>>>;

/// Consumer half returned by [`channel`]
///
/// [`channel`] 返回的消费者端
pub type OwnedConsumer<T, const CAPACITY: usize> = Consumer<Arc<RingBuffer<T, CAPACITY>>>;

/// Draining iterator for the ring buffer
///
/// 环形缓冲区的消费迭代器
///
/// This iterator pops elements until the buffer is observed empty. Elements pushed after
/// that point are left for the next call.
///
/// 此迭代器持续弹出元素，直到观察到缓冲区为空。之后推送的元素留给下一次调用。
pub struct Drain<'a, R> {
    consumer: &'a mut Consumer<R>,
}

impl<'a, T, const CAPACITY: usize, R> Iterator for Drain<'a, R>
where
    R: Deref<Target = RingBuffer<T, CAPACITY>>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.consumer.try_pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // The producer may keep adding elements, so there is no upper bound
        (self.consumer.size_approx(), None)
    }
}

/// Create a ring buffer shared through an `Arc` and return its two halves
///
/// 创建通过 `Arc` 共享的环形缓冲区并返回其两端
///
/// # Type Parameters
/// - `T`: Element type
/// - `CAPACITY`: Number of slots (must be ≥ 2); usable capacity is `CAPACITY - 1`
///
/// # 类型参数
/// - `T`: 元素类型
/// - `CAPACITY`: 槽位数量（必须 ≥ 2）；可用容量为 `CAPACITY - 1`
///
/// The buffer is dropped, together with any element still inside, when both halves are gone.
///
/// 当两端都被释放后，缓冲区连同其中剩余的元素一起被释放。
///
/// # Examples
///
/// ```
/// use staticring::spsc;
/// use std::thread;
///
/// let (mut producer, mut consumer) = spsc::channel::<String, 8>();
///
/// let handle = thread::spawn(move || {
///     for i in 0..10 {
///         let mut message = format!("message {i}");
///         while let Err(err) = producer.try_push(message) {
///             message = err.into_inner();
///             thread::yield_now();
///         }
///     }
/// });
///
/// let mut received = Vec::new();
/// while received.len() < 10 {
///     match consumer.try_pop() {
///         Some(message) => received.push(message),
///         None => thread::yield_now(),
///     }
/// }
///
/// handle.join().unwrap();
/// assert_eq!(received[9], "message 9");
/// ```
pub fn channel<T, const CAPACITY: usize>() -> (OwnedProducer<T, CAPACITY>, OwnedConsumer<T, CAPACITY>)
{
    tracing::debug!(
        capacity = RingBuffer::<T, CAPACITY>::USABLE,
        element = std::any::type_name::<T>(),
        "creating owned spsc channel"
    );

    let shared = Arc::new(RingBuffer::new());
    (Producer::new(shared.clone()), Consumer::new(shared))
}

impl<R> Producer<R> {
    #[inline]
    pub(crate) fn new(ring: R) -> Self {
        Self {
            ring,
            _not_sync: PhantomData,
        }
    }
}

impl<T, const CAPACITY: usize, R> Producer<R>
where
    R: Deref<Target = RingBuffer<T, CAPACITY>>,
{
    /// Get the usable capacity of the buffer
    ///
    /// 获取缓冲区的可用容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Get the approximate number of elements in the buffer
    ///
    /// 获取缓冲区中元素数量的近似值
    #[inline]
    pub fn size_approx(&self) -> usize {
        self.ring.size_approx()
    }

    /// Get the number of free slots in the buffer
    ///
    /// 获取缓冲区中的空闲空间数量
    ///
    /// The consumer can only free more slots, so the result is a lower bound.
    ///
    /// 消费者只会释放更多槽位，因此结果是一个下界。
    #[inline]
    pub fn free_slots(&self) -> usize {
        unsafe { self.ring.free_raw() }
    }

    /// Check if the buffer is full
    ///
    /// 检查缓冲区是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
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
        // `&mut self` on the only producer handle
        unsafe { self.ring.push_raw(value) }
    }

    /// Construct a value in place from `f`
    ///
    /// 通过 `f` 原地构造一个值
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
        unsafe { self.ring.emplace_raw(f) }
    }
}

impl<T: Copy, const CAPACITY: usize, R> Producer<R>
where
    R: Deref<Target = RingBuffer<T, CAPACITY>>,
{
    /// Push multiple values from a slice into the buffer
    ///
    /// 将切片中的多个值批量推送到缓冲区
    ///
    /// Pushes as many leading elements of `values` as fit and publishes them at once.
    ///
    /// 推送 `values` 中能放下的前若干个元素，并一次性发布。
    ///
    /// # Returns
    /// Number of elements successfully pushed (0 to values.len())
    ///
    /// # 返回值
    /// 成功推送的元素数量（0 到 values.len()）
    #[inline]
    pub fn push_slice(&mut self, values: &[T]) -> usize {
        if values.is_empty() {
            return 0;
        }
        unsafe { self.ring.push_slice_raw(values) }
    }
}

impl<R> Consumer<R> {
    #[inline]
    pub(crate) fn new(ring: R) -> Self {
        Self {
            ring,
            _not_sync: PhantomData,
        }
    }
}

impl<T, const CAPACITY: usize, R> Consumer<R>
where
    R: Deref<Target = RingBuffer<T, CAPACITY>>,
{
    /// Get the usable capacity of the buffer
    ///
    /// 获取缓冲区的可用容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Get the approximate number of elements in the buffer
    ///
    /// 获取缓冲区中元素数量的近似值
    ///
    /// The producer can only add elements, so the result is a lower bound.
    ///
    /// 生产者只会增加元素，因此结果是一个下界。
    #[inline]
    pub fn size_approx(&self) -> usize {
        self.ring.size_approx()
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
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
        // `&mut self` on the only consumer handle
        unsafe { self.ring.pop_raw() }
    }

    /// Peek at the oldest value without removing it
    ///
    /// 查看最早的值但不移除它
    ///
    /// The reference borrows the consumer, so no pop can happen while it is alive.
    ///
    /// 返回的引用借用了消费者，因此在其存活期间不会发生弹出。
    #[inline]
    pub fn front(&self) -> Option<&T> {
        unsafe { self.ring.front_raw() }
    }

    /// Create a draining iterator
    ///
    /// 创建一个消费迭代器
    ///
    /// # Examples
    ///
    /// ```
    /// use staticring::RingBuffer;
    ///
    /// let mut buffer = RingBuffer::<i32, 8>::new();
    /// let (mut producer, mut consumer) = buffer.split();
    /// producer.try_push(1).unwrap();
    /// producer.try_push(2).unwrap();
    /// producer.try_push(3).unwrap();
    ///
    /// let items: Vec<i32> = consumer.drain().collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// assert!(consumer.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, R> {
        Drain { consumer: self }
    }
}

impl<T: Copy, const CAPACITY: usize, R> Consumer<R>
where
    R: Deref<Target = RingBuffer<T, CAPACITY>>,
{
    /// Pop multiple values into a slice
    ///
    /// 将多个值批量弹出到切片
    ///
    /// # Returns
    /// Number of elements successfully popped (0 to dest.len())
    ///
    /// # 返回值
    /// 成功弹出的元素数量（0 到 dest.len()）
    #[inline]
    pub fn pop_slice(&mut self, dest: &mut [T]) -> usize {
        if dest.is_empty() {
            return 0;
        }
        unsafe { self.ring.pop_slice_raw(dest) }
    }
}
