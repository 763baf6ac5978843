//! Fixed-capacity circular storage.
//!
//! `RingBuffer` is the plain, single-owner storage layer underneath the
//! coordination gate. It is not synchronized itself; the gate serializes all
//! access through its mutex. Slots are `Option<T>` so a pop structurally
//! clears the slot it reads, and occupancy can never leave `[0, capacity]`.

use crate::error::TryPushError;

/// A fixed-capacity circular queue with explicit read/write cursors.
#[derive(Debug)]
pub struct RingBuffer<T> {
  slots: Box<[Option<T>]>,
  write_idx: usize,
  read_idx: usize,
  len: usize,
}

impl<T> RingBuffer<T> {
  /// Creates an empty ring with the given capacity.
  ///
  /// Capacity is validated by the gate and coordinator before construction;
  /// a zero capacity here is a caller bug.
  pub fn new(capacity: usize) -> Self {
    assert!(capacity > 0, "ring buffer capacity must be non-zero");
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    Self {
      slots: slots.into_boxed_slice(),
      write_idx: 0,
      read_idx: 0,
      len: 0,
    }
  }

  /// Total number of slots.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  /// Number of occupied slots.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub fn is_full(&self) -> bool {
    self.len == self.slots.len()
  }

  /// Writes `item` at the write cursor and advances it, wrapping at capacity.
  ///
  /// Returns the item back if the ring is full; an occupied slot is never
  /// overwritten.
  pub fn push(&mut self, item: T) -> Result<(), TryPushError<T>> {
    if self.is_full() {
      return Err(TryPushError::Full(item));
    }
    let slot = &mut self.slots[self.write_idx];
    debug_assert!(slot.is_none(), "write cursor landed on an occupied slot");
    *slot = Some(item);
    self.write_idx = (self.write_idx + 1) % self.slots.len();
    self.len += 1;
    Ok(())
  }

  /// Takes the item at the read cursor and advances it, wrapping at capacity.
  /// The slot is left empty. Returns `None` if the ring is empty.
  pub fn pop(&mut self) -> Option<T> {
    if self.is_empty() {
      return None;
    }
    let item = self.slots[self.read_idx]
      .take()
      .unwrap_or_else(|| unreachable!("read cursor landed on an empty slot"));
    self.read_idx = (self.read_idx + 1) % self.slots.len();
    self.len -= 1;
    Some(item)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn push_pop_fifo_order() {
    let mut ring = RingBuffer::new(4);
    for i in 0..4 {
      ring.push(i).unwrap();
    }
    assert!(ring.is_full());
    for i in 0..4 {
      assert_eq!(ring.pop(), Some(i));
    }
    assert!(ring.is_empty());
    assert_eq!(ring.pop(), None);
  }

  #[test]
  fn push_full_returns_item() {
    let mut ring = RingBuffer::new(1);
    ring.push("a").unwrap();
    match ring.push("b") {
      Err(TryPushError::Full(item)) => assert_eq!(item, "b"),
      other => panic!("expected Full, got {:?}", other),
    }
  }

  #[test]
  fn cursors_wrap_around() {
    let mut ring = RingBuffer::new(3);
    // Interleave pushes and pops so the cursors lap the storage repeatedly.
    for round in 0..10u32 {
      ring.push(round).unwrap();
      ring.push(round + 100).unwrap();
      assert_eq!(ring.pop(), Some(round));
      assert_eq!(ring.pop(), Some(round + 100));
    }
    assert!(ring.is_empty());
  }

  #[test]
  fn len_tracks_occupancy() {
    let mut ring = RingBuffer::new(2);
    assert_eq!(ring.len(), 0);
    ring.push(1).unwrap();
    assert_eq!(ring.len(), 1);
    ring.push(2).unwrap();
    assert_eq!(ring.len(), 2);
    ring.pop();
    assert_eq!(ring.len(), 1);
  }

  #[test]
  #[should_panic]
  fn zero_capacity_is_rejected() {
    let _ = RingBuffer::<u32>::new(0);
  }
}
