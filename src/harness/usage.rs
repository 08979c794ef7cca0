// Process CPU time, user + system, as reported by getrusage(2).

use nix::sys::{
   resource::{getrusage, UsageWho},
   time::{TimeVal, TimeValLike},
};
use std::time::Duration;

pub(crate) fn cpu_time() -> nix::Result<Duration> {
   let usage = getrusage(UsageWho::RUSAGE_SELF)?;
   Ok(to_duration(usage.user_time()) + to_duration(usage.system_time()))
}

fn to_duration(tv: TimeVal) -> Duration {
   Duration::from_micros(tv.num_microseconds().max(0) as u64)
}
