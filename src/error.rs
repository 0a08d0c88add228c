use thiserror::Error;

/// Ring buffer error for push operations
///
/// push 操作的环形缓冲区错误
///
/// The rejected payload is handed back untouched: the value for `try_push`, the
/// unused constructor closure for `try_emplace`.
///
/// 被拒绝的负载原样返回：`try_push` 返回值本身，`try_emplace` 返回未调用的构造闭包。
#[derive(Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError<T> {
    /// Buffer is full
    ///
    /// 缓冲区已满
    #[error("ring buffer is full")]
    Full(T),
}

impl<T> PushError<T> {
    /// Recover the rejected payload
    ///
    /// 取回被拒绝的负载
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            PushError::Full(value) => value,
        }
    }
}

// Closures are not Debug, so the payload is left out
impl<T> std::fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushError::Full(_) => f.write_str("Full(..)"),
        }
    }
}
