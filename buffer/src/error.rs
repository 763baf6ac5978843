use core::fmt;

/// Error returned when a run configuration is rejected before any task starts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
  /// The buffer capacity was zero. A bounded buffer needs at least one slot.
  ZeroCapacity,
}
impl std::error::Error for ConfigError {}
impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::ZeroCapacity => write!(f, "buffer capacity must be greater than zero"),
    }
  }
}

/// Error returned by `try_push` when the item could not be stored immediately.
/// The item being pushed is returned to the caller.
#[derive(PartialEq, Eq, Clone)]
pub enum TryPushError<T> {
  /// The buffer is full. Blocking `push` would have parked the caller.
  Full(T),
}

impl<T> TryPushError<T> {
  /// Consumes the error, returning the item that could not be pushed.
  #[inline]
  pub fn into_inner(self) -> T {
    match self {
      TryPushError::Full(item) => item,
    }
  }
}

impl<T> fmt::Debug for TryPushError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPushError::Full(_) => write!(f, "TryPushError::Full(..)"),
    }
  }
}

impl<T> fmt::Display for TryPushError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPushError::Full(_) => f.write_str("buffer full"),
    }
  }
}

impl<T: fmt::Debug> std::error::Error for TryPushError<T> {}

/// Error returned by `try_pop` when no item could be taken immediately.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TryPopError {
  /// The buffer is empty but more items may still arrive.
  Empty,
  /// The buffer is empty and every producer has finished: no item will
  /// ever arrive again.
  Drained,
}
impl std::error::Error for TryPopError {}
impl fmt::Display for TryPopError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPopError::Empty => write!(f, "buffer empty"),
      TryPopError::Drained => write!(f, "buffer drained (empty and all producers finished)"),
    }
  }
}
