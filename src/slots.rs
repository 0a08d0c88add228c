//! Fixed block of maybe-uninitialized slots
//!
//! 固定数量的未初始化槽位块
//!
//! This module provides the raw storage behind the ring buffer: `N` cells, each able to hold
//! exactly one `T`. There is no per-slot tag, so the storage never knows which cells are live.
//! Liveness is tracked by the owner through its head/tail indices.
//!
//! 此类型为环形缓冲区提供原始存储：`N` 个单元，每个恰好容纳一个 `T`。
//! 槽位没有标记，存储本身不知道哪些单元是存活的，存活状态由持有者通过 head/tail 索引跟踪。

use crate::shim::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ptr;

/// Fixed array of interior-mutable, maybe-uninitialized slots
///
/// 固定长度的内部可变未初始化槽位数组
///
/// # Type Parameters
/// - `T`: Element type
/// - `N`: Number of slots
///
/// # 类型参数
/// - `T`: 元素类型
/// - `N`: 槽位数量
pub struct Slots<T, const N: usize> {
    cells: [UnsafeCell<MaybeUninit<T>>; N],
}

impl<T, const N: usize> Slots<T, N> {
    /// Create `N` uninitialized slots
    ///
    /// 创建 `N` 个未初始化的槽位
    #[inline]
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
        }
    }

    #[inline(always)]
    unsafe fn cell(&self, index: usize) -> &UnsafeCell<MaybeUninit<T>> {
        debug_assert!(index < N, "slot index out of bounds");
        unsafe { self.cells.get_unchecked(index) }
    }

    /// Construct `value` in place at `index`
    ///
    /// 在 `index` 处原地构造 `value`
    ///
    /// # Safety
    /// - `index` must be < N
    /// - The slot must be empty (a live value would be leaked)
    /// - No other thread may access this slot concurrently
    ///
    /// # 安全性
    /// - `index` 必须 < N
    /// - 槽位必须为空（否则存活值会泄漏）
    /// - 不得有其他线程并发访问该槽位
    #[inline]
    pub unsafe fn write(&self, index: usize, value: T) {
        unsafe {
            self.cell(index)
                .with_mut(|slot| ptr::write(slot.cast::<T>(), value));
        }
    }

    /// Move the value out of `index`, leaving the slot logically empty
    ///
    /// 将 `index` 处的值移出，槽位在逻辑上变为空
    ///
    /// # Safety
    /// - `index` must be < N
    /// - The slot must hold a live value
    /// - No other thread may access this slot concurrently
    ///
    /// # 安全性
    /// - `index` 必须 < N
    /// - 槽位必须持有存活值
    /// - 不得有其他线程并发访问该槽位
    #[inline]
    pub unsafe fn take(&self, index: usize) -> T {
        unsafe { self.cell(index).with_mut(|slot| ptr::read(slot.cast::<T>())) }
    }

    /// Borrow the live value at `index`
    ///
    /// 借用 `index` 处的存活值
    ///
    /// # Safety
    /// - `index` must be < N
    /// - The slot must hold a live value for the whole lifetime of the returned reference
    ///
    /// # 安全性
    /// - `index` 必须 < N
    /// - 在返回引用的整个生命周期内槽位必须持有存活值
    #[inline]
    pub unsafe fn get(&self, index: usize) -> &T {
        unsafe { &*self.cell(index).with(|slot| slot.cast::<T>()) }
    }

    /// Run the destructor of the live value at `index`
    ///
    /// 对 `index` 处的存活值执行析构
    ///
    /// # Safety
    /// Same as [`Slots::take`].
    #[inline]
    pub unsafe fn drop_in_place(&self, index: usize) {
        unsafe {
            self.cell(index)
                .with_mut(|slot| ptr::drop_in_place(slot.cast::<T>()));
        }
    }
}

/// Batch copy operations for Copy types
///
/// Copy 类型的批量拷贝操作
impl<T: Copy, const N: usize> Slots<T, N> {
    /// Copy `values` into consecutive slots starting at `start`, wrapping past the end
    ///
    /// 从 `start` 开始将 `values` 拷贝到连续槽位，越过末尾时环绕
    ///
    /// # Safety
    /// - `start` must be < N and `values.len()` must be <= N
    /// - Every target slot must be empty and not accessed concurrently
    ///
    /// # 安全性
    /// - `start` 必须 < N，且 `values.len()` 必须 <= N
    /// - 每个目标槽位必须为空且没有并发访问
    pub unsafe fn copy_from_slice(&self, start: usize, values: &[T]) {
        debug_assert!(values.len() <= N);
        let (first, second) = values.split_at(values.len().min(N - start));

        unsafe {
            for (offset, &value) in first.iter().enumerate() {
                self.write(start + offset, value);
            }
            // Wrap-around: continue from slot 0
            // 环绕：从槽位 0 继续
            for (index, &value) in second.iter().enumerate() {
                self.write(index, value);
            }
        }
    }

    /// Copy `dest.len()` values out of consecutive slots starting at `start`, wrapping past the end
    ///
    /// 从 `start` 开始的连续槽位中拷贝出 `dest.len()` 个值，越过末尾时环绕
    ///
    /// # Safety
    /// - `start` must be < N and `dest.len()` must be <= N
    /// - Every source slot must hold a live value and not be written concurrently
    ///
    /// # 安全性
    /// - `start` 必须 < N，且 `dest.len()` 必须 <= N
    /// - 每个源槽位必须持有存活值且没有并发写入
    pub unsafe fn copy_to_slice(&self, start: usize, dest: &mut [T]) {
        debug_assert!(dest.len() <= N);
        let split = dest.len().min(N - start);
        let (first, second) = dest.split_at_mut(split);

        unsafe {
            for (offset, out) in first.iter_mut().enumerate() {
                *out = self.take(start + offset);
            }
            for (index, out) in second.iter_mut().enumerate() {
                *out = self.take(index);
            }
        }
    }
}

// Note: Slots does NOT implement Drop because it stores MaybeUninit<T>.
// The owner is responsible for dropping the live range.
//
// 注意：Slots 不实现 Drop，因为它存储 MaybeUninit<T>。
// 持有者负责释放存活区间内的元素。
