//! Sliding-window sort for streams whose disorder is bounded in time.
//!
//! Incoming items collect in an unsorted buffer. Once an item arrives more
//! than one window past the boundary set at the previous freeze, the buffer
//! is frozen: sorted, merged with the items held back last time, and cut at
//! `now - window`. Everything at or before the cut is emitted, the rest is
//! held for the next freeze.
//!
//! No later item can sort before the cut as long as no item arrives more
//! than one window behind an item already seen, and ordinals never decrease
//! in arrival order. The output is then the full `(timestamp, ordinal)` sort
//! of the stream while memory holds roughly two windows of items.

use crate::event::EventKey;

#[derive(Debug)]
struct Keyed<T> {
    key: EventKey,
    item: T,
}

#[derive(Debug)]
pub struct WindowedReorderer<T> {
    window_ms: i64,
    /// Arrivals since the last freeze, unsorted.
    buffer: Vec<Keyed<T>>,
    /// Sorted items newer than the last cut.
    held: Vec<Keyed<T>>,
    /// Merge target, reused across freezes.
    merged: Vec<Keyed<T>>,
    boundary: Option<i64>,
    last_cut: Option<i64>,
    late: u64,
}

impl<T> WindowedReorderer<T> {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms: window_ms.max(0),
            buffer: Vec::new(),
            held: Vec::new(),
            merged: Vec::new(),
            boundary: None,
            last_cut: None,
            late: 0,
        }
    }

    /// Items currently buffered or held.
    pub fn pending(&self) -> usize {
        self.buffer.len() + self.held.len()
    }

    /// Items that arrived behind a cut already emitted. Their order in the
    /// output is not guaranteed.
    pub fn late(&self) -> u64 {
        self.late
    }

    pub fn push<E>(
        &mut self,
        key: EventKey,
        item: T,
        emit: &mut impl FnMut(T) -> Result<(), E>,
    ) -> Result<(), E> {
        let now = key.timestamp_ms;
        if self.last_cut.is_some_and(|cut| now < cut) {
            self.late += 1;
        }
        self.buffer.push(Keyed { key, item });

        match self.boundary {
            None => self.boundary = Some(now.saturating_add(self.window_ms)),
            Some(boundary) if now > boundary => {
                self.freeze(now, emit)?;
                self.boundary = Some(now.saturating_add(self.window_ms));
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Emits everything still pending, in order.
    pub fn finish<E>(&mut self, emit: &mut impl FnMut(T) -> Result<(), E>) -> Result<(), E> {
        self.sort_and_merge();
        for keyed in self.merged.drain(..) {
            emit(keyed.item)?;
        }
        self.boundary = None;
        Ok(())
    }

    fn freeze<E>(&mut self, now: i64, emit: &mut impl FnMut(T) -> Result<(), E>) -> Result<(), E> {
        self.sort_and_merge();

        let cut = now.saturating_sub(self.window_ms);
        let ready = self.merged.partition_point(|k| k.key.timestamp_ms <= cut);
        self.held.extend(self.merged.drain(ready..));
        self.last_cut = Some(cut);

        for keyed in self.merged.drain(..) {
            emit(keyed.item)?;
        }
        Ok(())
    }

    /// Sorts the buffer and merges it with the held items into `merged`,
    /// leaving both sources empty.
    fn sort_and_merge(&mut self) {
        self.buffer.sort_by_key(|k| k.key);
        merge_sorted(&mut self.held, &mut self.buffer, &mut self.merged);
    }
}

/// Stable two-way merge; on equal keys `left` goes first.
fn merge_sorted<T>(left: &mut Vec<Keyed<T>>, right: &mut Vec<Keyed<T>>, out: &mut Vec<Keyed<T>>) {
    out.reserve(left.len() + right.len());
    let mut left = left.drain(..).peekable();
    let mut right = right.drain(..).peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l.key <= r.key,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        out.extend(next);
    }
}
