mod bounded;
mod pop;

pub use bounded::BoundedQueue;
pub use pop::{GetTimeout, Pop, PutTimeoutError};
