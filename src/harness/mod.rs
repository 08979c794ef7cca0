// Trial driver
//
// Each trial builds its own queue, lends it to scoped producer and consumer
// threads, and only lets the queue go once every thread has been joined.
// Nothing is shared between trials.

mod config;
mod error;
mod report;
mod usage;

pub use config::{TrialConfig, DEFAULT_CAPACITY, DEFAULT_ITEMS};
pub use error::{ConfigError, Role, TrialError};
pub use report::{Summary, TrialReport};

use crate::{BlockingQueue, BoundedQueue, Pop};
use std::{
   sync::atomic::{AtomicUsize, Ordering},
   thread,
   time::Instant,
};
use tracing::{debug, info, trace, warn};

/// Runs one trial against a fresh `BoundedQueue`.
pub fn run_trial(config: &TrialConfig) -> Result<TrialReport, TrialError> {
   run_trial_with(config, BoundedQueue::new)
}

/// Runs one trial against a queue built by `make_queue(config.capacity)`.
///
/// Consumers are started before producers, so a failed producer spawn still
/// leaves someone draining the queue and the trial can wind down and report
/// the error instead of hanging.
///
/// A panicking worker fails the trial with `TrialError::WorkerPanicked`. When
/// the last live consumer unwinds, it lifts the capacity bound with
/// `resize(usize::MAX)`, so producers blocked on a full queue can finish
/// instead of waiting forever. The rest of the stream then piles up in the
/// queue unconsumed until the trial returns.
pub fn run_trial_with<Q, F>(config: &TrialConfig, make_queue: F) -> Result<TrialReport, TrialError>
where
   Q: BlockingQueue<u64>,
   F: FnOnce(usize) -> Q,
{
   config.validate()?;
   let queue = make_queue(config.capacity);
   let items = config.items_per_producer;

   let cpu_start = usage::cpu_time()?;
   let start = Instant::now();

   let live_consumers = AtomicUsize::new(config.consumers);

   let per_consumer = crossbeam::scope(|s| {
      let queue = &queue;
      let live = &live_consumers;

      let mut consumers = Vec::with_capacity(config.consumers);
      for id in 0..config.consumers {
         let spawned = s
            .builder()
            .name(format!("consumer-{id}"))
            .spawn(move |_| consume(queue, live, id));
         match spawned {
            Ok(handle) => consumers.push(handle),
            Err(source) => {
               queue.close();
               return Err(TrialError::Spawn { role: Role::Consumer, source });
            }
         }
      }

      let mut producers = Vec::with_capacity(config.producers);
      let mut failure = None;
      for id in 0..config.producers {
         let spawned = s
            .builder()
            .name(format!("producer-{id}"))
            .spawn(move |_| produce(queue, id, items));
         match spawned {
            Ok(handle) => producers.push(handle),
            Err(source) => {
               failure = Some(TrialError::Spawn { role: Role::Producer, source });
               break;
            }
         }
      }

      for handle in producers {
         if handle.join().is_err() {
            failure.get_or_insert(TrialError::WorkerPanicked { role: Role::Producer });
         }
      }

      // every real value is in the queue now
      queue.close();

      let mut counts = Vec::with_capacity(consumers.len());
      for handle in consumers {
         match handle.join() {
            Ok(n) => counts.push(n),
            Err(_) => {
               failure.get_or_insert(TrialError::WorkerPanicked { role: Role::Consumer });
            }
         }
      }

      match failure {
         Some(err) => Err(err),
         None => Ok(counts),
      }
   })
   .map_err(|_| TrialError::Scope)??;

   let elapsed = start.elapsed();
   let cpu_time = usage::cpu_time()?.saturating_sub(cpu_start);

   let report = TrialReport { config: *config, elapsed, cpu_time, per_consumer };
   info!(
      producers = config.producers,
      consumers = config.consumers,
      capacity = config.capacity,
      consumed = report.items_consumed(),
      elapsed_s = elapsed.as_secs_f64(),
      "trial finished"
   );
   Ok(report)
}

/// Runs every trial in order, handing each report to `observe` as soon as it
/// is ready. Stops at the first failing trial.
pub fn run_plan<F>(plan: &[TrialConfig], mut observe: F) -> Result<Vec<TrialReport>, TrialError>
where
   F: FnMut(usize, &TrialReport),
{
   let mut reports = Vec::with_capacity(plan.len());
   for (i, config) in plan.iter().enumerate() {
      let report = run_trial(config)?;
      observe(i, &report);
      reports.push(report);
   }
   Ok(reports)
}

fn produce<Q: BlockingQueue<u64>>(queue: &Q, id: usize, items: u64) {
   trace!(id, items, "producer started");
   for value in 0..items {
      queue.put(value);
   }
   debug!(id, "producer done");
}

// Dropped when a consumer returns or unwinds.
struct ConsumerGuard<'a, Q: BlockingQueue<u64>> {
   queue: &'a Q,
   live : &'a AtomicUsize,
   id   : usize,
}

impl<Q: BlockingQueue<u64>> Drop for ConsumerGuard<'_, Q> {
   fn drop(&mut self) {
      let last = self.live.fetch_sub(1, Ordering::AcqRel) == 1;
      if last && thread::panicking() {
         warn!(id = self.id, "last consumer panicked, lifting capacity bound");
         self.queue.resize(usize::MAX);
      }
   }
}

fn consume<Q: BlockingQueue<u64>>(queue: &Q, live: &AtomicUsize, id: usize) -> u64 {
   let _guard = ConsumerGuard { queue, live, id };
   trace!(id, "consumer started");
   let mut received = 0;
   while let Pop::Item(_) = queue.get() {
      received += 1;
   }
   debug!(id, received, "consumer saw end of stream");
   received
}
