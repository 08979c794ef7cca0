use mpmc_queues::harness::{self, Summary, TrialConfig};
use std::process::ExitCode;
use tracing::{error, Level};

fn main() -> ExitCode {
   tracing_subscriber::fmt()
      .with_max_level(Level::INFO)
      .with_writer(std::io::stderr)
      .with_target(false)
      .init();

   let plan = TrialConfig::default_plan();
   let outcome = harness::run_plan(&plan, |i, report| {
      println!("trial {}: {}", i + 1, report);
   });

   match outcome {
      Ok(reports) => {
         print!("{}", Summary(&reports));
         ExitCode::SUCCESS
      }
      Err(err) => {
         error!(error = %err, "trial aborted");
         ExitCode::FAILURE
      }
   }
}
