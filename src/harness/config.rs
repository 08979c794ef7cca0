use crate::harness::ConfigError;

pub const DEFAULT_CAPACITY: usize = 5;
pub const DEFAULT_ITEMS   : u64   = 1_000_000;

/// One timed run: how many threads on each side and how big the queue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
   pub producers         : usize,
   pub consumers         : usize,
   pub capacity          : usize,
   /// Every producer emits `0..items_per_producer`.
   pub items_per_producer: u64,
}

impl TrialConfig {
   pub const fn new(producers: usize, consumers: usize, capacity: usize) -> Self {
      Self { producers, consumers, capacity, items_per_producer: DEFAULT_ITEMS }
   }

   pub const fn with_items(mut self, items_per_producer: u64) -> Self {
      self.items_per_producer = items_per_producer;
      self
   }

   /// Items the consumers must receive between them.
   pub fn total_items(&self) -> u64 {
      self.producers as u64 * self.items_per_producer
   }

   pub fn validate(&self) -> Result<(), ConfigError> {
      if self.producers == 0 {
         return Err(ConfigError::ZeroProducers);
      }
      if self.consumers == 0 {
         return Err(ConfigError::ZeroConsumers);
      }
      if self.capacity == 0 {
         return Err(ConfigError::ZeroCapacity);
      }
      if self.items_per_producer == 0 {
         return Err(ConfigError::ZeroItems);
      }
      Ok(())
   }

   /// The four producer/consumer ratios the binary runs.
   pub fn default_plan() -> Vec<Self> {
      vec![
         Self::new(1, 4, DEFAULT_CAPACITY),
         Self::new(4, 1, DEFAULT_CAPACITY),
         Self::new(2, 5, DEFAULT_CAPACITY),
         Self::new(1, 1, DEFAULT_CAPACITY),
      ]
   }
}
