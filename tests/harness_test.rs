// mpmc_queues/tests/harness_test.rs

use mpmc_queues::harness::{self, ConfigError, Role, Summary, TrialConfig, TrialError};
use mpmc_queues::{BlockingQueue, BoundedQueue, Pop};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

// Wraps a real queue; `put` panics once `put_budget` calls have gone through,
// `get` panics once `get_budget` calls have gone through.
struct FaultyQueue {
   inner     : BoundedQueue<u64>,
   put_budget: usize,
   get_budget: usize,
   puts      : AtomicUsize,
   gets      : AtomicUsize,
}

impl FaultyQueue {
   fn new(capacity: usize, put_budget: usize, get_budget: usize) -> Self {
      Self {
         inner: BoundedQueue::new(capacity),
         put_budget,
         get_budget,
         puts: AtomicUsize::new(0),
         gets: AtomicUsize::new(0),
      }
   }
}

impl BlockingQueue<u64> for FaultyQueue {
   fn put(&self, item: u64) {
      if self.puts.fetch_add(1, Ordering::SeqCst) >= self.put_budget {
         panic!("put failed");
      }
      self.inner.put(item)
   }

   fn get(&self) -> Pop<u64> {
      if self.gets.fetch_add(1, Ordering::SeqCst) >= self.get_budget {
         panic!("get failed");
      }
      self.inner.get()
   }

   fn close(&self) {
      self.inner.close()
   }

   fn resize(&self, capacity: usize) {
      self.inner.resize(capacity)
   }
}

// Runs the trial on a side thread so a hang fails the test instead of the suite.
fn run_bounded<F>(config: TrialConfig, make_queue: F) -> Result<(), TrialError>
where
   F: FnOnce(usize) -> FaultyQueue + Send + 'static,
{
   let (tx, rx) = mpsc::channel();
   thread::spawn(move || {
      let outcome = harness::run_trial_with(&config, make_queue).map(|_| ());
      let _ = tx.send(outcome);
   });
   rx.recv_timeout(Duration::from_secs(10))
      .expect("trial still running after 10s")
}


#[test]
fn test_trial_consumes_every_item() {
   let config = TrialConfig::new(2, 3, 5).with_items(10_000);
   let report = harness::run_trial(&config).unwrap();

   assert_eq!(report.config, config);
   assert_eq!(report.per_consumer.len(), 3);
   assert_eq!(report.items_consumed(), 20_000);
   assert!(report.throughput() > 0.0);
}

#[test]
fn test_trial_ratios_from_default_plan_with_fewer_items() {
   for config in TrialConfig::default_plan() {
      let config = config.with_items(5_000);
      let report = harness::run_trial(&config).unwrap();
      assert_eq!(
         report.items_consumed(),
         config.total_items(),
         "lost items for {}p/{}c",
         config.producers,
         config.consumers
      );
   }
}

#[test]
fn test_trial_rejects_invalid_config() {
   let config = TrialConfig::new(1, 0, 5).with_items(10);
   match harness::run_trial(&config) {
      Err(TrialError::Config(ConfigError::ZeroConsumers)) => {}
      other => panic!("expected ZeroConsumers, got {:?}", other),
   }
}

#[test]
fn test_trial_with_custom_queue_factory() {
   let built_with = Arc::new(AtomicUsize::new(0));
   let seen = built_with.clone();
   let config = TrialConfig::new(3, 2, 7).with_items(1_000);

   let report = harness::run_trial_with(&config, move |cap| {
      seen.store(cap, Ordering::SeqCst);
      BoundedQueue::new(cap)
   })
   .unwrap();

   assert_eq!(built_with.load(Ordering::SeqCst), 7);
   assert_eq!(report.items_consumed(), 3_000);
}

#[test]
fn test_plan_reports_are_index_aligned() {
   let plan = [
      TrialConfig::new(1, 1, 5).with_items(100),
      TrialConfig::new(2, 1, 3).with_items(200),
      TrialConfig::new(1, 3, 1).with_items(300),
   ];
   let mut observed = Vec::new();
   let reports = harness::run_plan(&plan, |i, r| observed.push((i, r.items_consumed()))).unwrap();

   assert_eq!(observed, vec![(0, 100), (1, 400), (2, 300)]);
   assert_eq!(reports.len(), plan.len());
   for (report, config) in reports.iter().zip(plan.iter()) {
      assert_eq!(&report.config, config);
   }

   let summary = Summary(&reports).to_string();
   assert_eq!(summary.lines().count(), 1 + plan.len());
}

#[test]
fn test_plan_stops_at_first_bad_trial() {
   let plan = [
      TrialConfig::new(1, 1, 5).with_items(10),
      TrialConfig::new(1, 1, 0).with_items(10),
      TrialConfig::new(1, 1, 5).with_items(10),
   ];
   let mut calls = 0;
   let err = harness::run_plan(&plan, |_, _| calls += 1).unwrap_err();

   assert!(matches!(err, TrialError::Config(ConfigError::ZeroCapacity)));
   assert_eq!(calls, 1);
}

#[test]
fn test_producer_panic_fails_trial() {
   let config = TrialConfig::new(1, 2, 5).with_items(100);
   match run_bounded(config, |cap| FaultyQueue::new(cap, 10, usize::MAX)) {
      Err(TrialError::WorkerPanicked { role: Role::Producer }) => {}
      other => panic!("expected producer panic, got {:?}", other),
   }
}

#[test]
fn test_consumer_panic_fails_trial_without_hanging() {
   // lone consumer dies on its first get while the producer still has 100 items
   let config = TrialConfig::new(1, 1, 5).with_items(100);
   match run_bounded(config, |cap| FaultyQueue::new(cap, usize::MAX, 0)) {
      Err(TrialError::WorkerPanicked { role: Role::Consumer }) => {}
      other => panic!("expected consumer panic, got {:?}", other),
   }
}

#[test]
fn test_every_consumer_panicking_mid_stream_fails_trial() {
   // three consumers share 20 successful gets, then each one panics
   let config = TrialConfig::new(2, 3, 2).with_items(1_000);
   match run_bounded(config, |cap| FaultyQueue::new(cap, usize::MAX, 20)) {
      Err(TrialError::WorkerPanicked { role: Role::Consumer }) => {}
      other => panic!("expected consumer panic, got {:?}", other),
   }
}
