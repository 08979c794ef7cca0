pub mod mpmc;
pub mod harness;

pub use mpmc::BoundedQueue;
pub use mpmc::{GetTimeout, Pop, PutTimeoutError};

/// Common interface for blocking multi-producer / multi-consumer queues.
pub trait BlockingQueue<T: Send>: Send + Sync {
    /// Blocks while the queue is full, then appends `item` at the tail.
    fn put(&self, item: T);
    /// Blocks while the queue is empty and still open.
    fn get(&self) -> Pop<T>;

    /// Latches the queue closed; consumers drain what is left, then see `Closed`.
    fn close(&self);
    /// Replaces the capacity; shrinking never evicts queued items.
    fn resize(&self, capacity: usize);
}
