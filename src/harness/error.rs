use std::{fmt, io};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
   Producer,
   Consumer,
}

impl fmt::Display for Role {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Role::Producer => f.write_str("producer"),
         Role::Consumer => f.write_str("consumer"),
      }
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
   #[error("a trial needs at least one producer")]
   ZeroProducers,
   #[error("a trial needs at least one consumer")]
   ZeroConsumers,
   #[error("queue capacity must be greater than zero")]
   ZeroCapacity,
   #[error("each producer must emit at least one item")]
   ZeroItems,
}

#[derive(Debug, Error)]
pub enum TrialError {
   #[error("invalid trial configuration: {0}")]
   Config(#[from] ConfigError),
   #[error("failed to spawn {role} thread")]
   Spawn {
      role: Role,
      #[source]
      source: io::Error,
   },
   #[error("{role} thread panicked")]
   WorkerPanicked { role: Role },
   #[error("worker thread panicked outside of a join")]
   Scope,
   #[error("failed to read process CPU usage")]
   Usage(#[from] nix::Error),
}
