use crate::harness::TrialConfig;
use std::{fmt, time::Duration};

/// What one trial measured.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialReport {
   pub config      : TrialConfig,
   pub elapsed     : Duration,
   /// User + system CPU time the whole process burned during the trial.
   pub cpu_time    : Duration,
   /// Items each consumer received, indexed by consumer id.
   pub per_consumer: Vec<u64>,
}

impl TrialReport {
   pub fn items_consumed(&self) -> u64 {
      self.per_consumer.iter().sum()
   }

   /// Items handed off per wall-clock second.
   pub fn throughput(&self) -> f64 {
      let secs = self.elapsed.as_secs_f64();
      if secs == 0.0 {
         return 0.0;
      }
      self.items_consumed() as f64 / secs
   }
}

impl fmt::Display for TrialReport {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(
         f,
         "producers={} consumers={} capacity={} items={} elapsed={:.6}s cpu={:.6}s throughput={:.0}/s",
         self.config.producers,
         self.config.consumers,
         self.config.capacity,
         self.config.items_per_producer,
         self.elapsed.as_secs_f64(),
         self.cpu_time.as_secs_f64(),
         self.throughput(),
      )
   }
}

/// Final listing of every trial's duration, one line each.
pub struct Summary<'a>(pub &'a [TrialReport]);

impl fmt::Display for Summary<'_> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      writeln!(f, "summary:")?;
      for (i, r) in self.0.iter().enumerate() {
         writeln!(
            f,
            "  trial {} ({}p/{}c): {:.6}s",
            i + 1,
            r.config.producers,
            r.config.consumers,
            r.elapsed.as_secs_f64(),
         )?;
      }
      Ok(())
   }
}
