// Blocking bounded multi-producer / multi-consumer queue
//
// Classic monitor: one lock over the whole state, two condition variables.
// Producers park on `not_full`, consumers park on `not_empty`. Shutdown is a
// one-way `closing` latch checked before every consumer wait, so a closed and
// drained queue answers `get` immediately with `Pop::Closed`.
//
// Caller contract (not checked): call `close` only after every producer has
// returned. Items put after `close` are still delivered, but consumers that
// already saw `Closed` are gone. A producer blocked on a full queue with no
// live consumer stays blocked forever.

use crate::mpmc::{GetTimeout, Pop, PutTimeoutError};
use crate::BlockingQueue;
use parking_lot::{Condvar, Mutex};
use std::{collections::VecDeque, fmt, time::Instant};
use tracing::debug;

/*──────────────────────────────────────────────────────────────────────────*/
/*  Shared state                                                            */
/*──────────────────────────────────────────────────────────────────────────*/

struct State<T> {
   items   : VecDeque<T>,
   capacity: usize,          // changed only by `resize`
   closing : bool,           // never reset once set
}

impl<T> State<T> {
   #[inline]
   fn is_full(&self) -> bool {
      self.items.len() >= self.capacity
   }
}

pub struct BoundedQueue<T> {
   state    : Mutex<State<T>>,
   not_full : Condvar,
   not_empty: Condvar,
}

/*──────────────────────────────  constructor  ─────────────────────────────*/

impl<T> BoundedQueue<T> {
   pub fn new(capacity: usize) -> Self {
      assert!(capacity > 0, "capacity must be greater than zero");
      Self {
         state: Mutex::new(State {
            items: VecDeque::with_capacity(capacity),
            capacity,
            closing: false,
         }),
         not_full : Condvar::new(),
         not_empty: Condvar::new(),
      }
   }
}

/*──────────────────────────── queue operations ────────────────────────────*/

impl<T> BoundedQueue<T> {
   /// Blocks while the queue holds `capacity` items or more.
   pub fn put(&self, value: T) {
      let mut state = self.state.lock();
      while state.is_full() {
         self.not_full.wait(&mut state);
      }
      state.items.push_back(value);
      self.not_empty.notify_one();
   }

   /// Blocks while the queue is empty and open.
   ///
   /// Buffered items are always handed out before `Closed`, and once the
   /// queue is closed and drained every call returns `Closed` without waiting.
   pub fn get(&self) -> Pop<T> {
      let mut state = self.state.lock();
      loop {
         if let Some(v) = state.items.pop_front() {
            self.not_full.notify_one();
            return Pop::Item(v);
         }
         if state.closing {
            return Pop::Closed;
         }
         self.not_empty.wait(&mut state);
      }
   }

   /// Like `put`, but gives up at `deadline` and hands the value back.
   pub fn put_deadline(&self, value: T, deadline: Instant) -> Result<(), PutTimeoutError<T>> {
      let mut state = self.state.lock();
      let mut timed_out = false;
      while state.is_full() {
         if timed_out {
            return Err(PutTimeoutError(value));
         }
         timed_out = self.not_full.wait_until(&mut state, deadline).timed_out();
      }
      state.items.push_back(value);
      self.not_empty.notify_one();
      Ok(())
   }

   /// Like `get`, but gives up at `deadline`.
   pub fn get_deadline(&self, deadline: Instant) -> GetTimeout<T> {
      let mut state = self.state.lock();
      let mut timed_out = false;
      loop {
         if let Some(v) = state.items.pop_front() {
            self.not_full.notify_one();
            return GetTimeout::Ready(Pop::Item(v));
         }
         if state.closing {
            return GetTimeout::Ready(Pop::Closed);
         }
         if timed_out {
            return GetTimeout::TimedOut;
         }
         timed_out = self.not_empty.wait_until(&mut state, deadline).timed_out();
      }
   }

   /// Signals that no further items will be produced and releases every
   /// waiting consumer. Calling it again has no further effect.
   pub fn close(&self) {
      let mut state = self.state.lock();
      if !state.closing {
         state.closing = true;
         debug!(buffered = state.items.len(), "queue closed");
      }
      drop(state);
      self.not_empty.notify_all();
   }

   /// Replaces the capacity and lets every blocked producer re-check it.
   ///
   /// Shrinking below the current occupancy never evicts anything; later
   /// `put` calls simply block until consumers bring the count under the new
   /// bound.
   pub fn resize(&self, capacity: usize) {
      assert!(capacity > 0, "capacity must be greater than zero");
      let mut state = self.state.lock();
      let previous = std::mem::replace(&mut state.capacity, capacity);
      debug!(previous, capacity, occupancy = state.items.len(), "queue resized");
      drop(state);
      self.not_full.notify_all();
   }
}

/*──────────────────────────────── observers ───────────────────────────────*/

impl<T> BoundedQueue<T> {
   pub fn len(&self) -> usize {
      self.state.lock().items.len()
   }

   pub fn is_empty(&self) -> bool {
      self.state.lock().items.is_empty()
   }

   pub fn capacity(&self) -> usize {
      self.state.lock().capacity
   }

   pub fn is_closed(&self) -> bool {
      self.state.lock().closing
   }

   /// `(len, capacity)` read under a single lock acquisition.
   pub fn occupancy(&self) -> (usize, usize) {
      let state = self.state.lock();
      (state.items.len(), state.capacity)
   }
}

impl<T: Send> BlockingQueue<T> for BoundedQueue<T> {
   #[inline]
   fn put(&self, item: T) {
      BoundedQueue::put(self, item)
   }

   #[inline]
   fn get(&self) -> Pop<T> {
      BoundedQueue::get(self)
   }

   #[inline]
   fn close(&self) {
      BoundedQueue::close(self)
   }

   #[inline]
   fn resize(&self, capacity: usize) {
      BoundedQueue::resize(self, capacity)
   }
}

impl<T> fmt::Debug for BoundedQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let state = self.state.lock();
      f.debug_struct("BoundedQueue")
       .field("len", &state.items.len())
       .field("capacity", &state.capacity)
       .field("closing", &state.closing)
       .finish()
   }
}
