use std::fmt;

use thiserror::Error;

/// Outcome of a blocking pull.
///
/// End of stream travels out of band, so every value of `T` stays usable as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pop<T> {
   Item(T),
   Closed,
}

impl<T> Pop<T> {
   #[inline]
   pub fn is_closed(&self) -> bool {
      matches!(self, Pop::Closed)
   }

   #[inline]
   pub fn into_item(self) -> Option<T> {
      match self {
         Pop::Item(v) => Some(v),
         Pop::Closed  => None,
      }
   }
}

/// Outcome of `get_deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetTimeout<T> {
   Ready(Pop<T>),
   TimedOut,
}

/// Returned by `put_deadline` when no slot opened in time; carries the value back.
#[derive(Error, PartialEq, Eq)]
#[error("timed out waiting for a free slot")]
pub struct PutTimeoutError<T>(pub T);

impl<T> PutTimeoutError<T> {
   pub fn into_inner(self) -> T {
      self.0
   }
}

impl<T> fmt::Debug for PutTimeoutError<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("PutTimeoutError(..)")
   }
}
