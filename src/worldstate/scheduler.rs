//! The two periodic loops driving the world view.
//!
//! A 1-second tick advances the local countdowns and a 60-second check asks
//! the refresh policy whether to re-poll. They are independent tasks: a slow
//! network fetch can never stall the countdown. Dropping the scheduler
//! aborts both tasks, so leaving the world view stops them immediately.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Signals produced by the periodic tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldTick {
  /// Fine-grained countdown tick, once per second
  Second,
  /// Coarse refresh-policy check, once per minute
  RefreshCheck,
}

/// Owns the interval tasks and the channel they feed.
pub struct Scheduler {
  rx: mpsc::UnboundedReceiver<WorldTick>,
  tasks: [JoinHandle<()>; 2],
}

impl Scheduler {
  pub fn start() -> Self {
    Self::with_periods(Duration::from_secs(1), Duration::from_secs(60))
  }

  fn with_periods(tick: Duration, check: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    let tasks = [
      spawn_interval(tick, WorldTick::Second, tx.clone()),
      spawn_interval(check, WorldTick::RefreshCheck, tx),
    ];
    Self { rx, tasks }
  }

  /// Drain one pending signal without blocking; the view calls this from
  /// its own tick until empty.
  pub fn try_next(&mut self) -> Option<WorldTick> {
    self.rx.try_recv().ok()
  }
}

fn spawn_interval(
  period: Duration,
  signal: WorldTick,
  tx: mpsc::UnboundedSender<WorldTick>,
) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the view already does an
    // immediate refresh on entry, so skip it.
    interval.tick().await;
    loop {
      interval.tick().await;
      if tx.send(signal).is_err() {
        break;
      }
    }
  })
}

impl Drop for Scheduler {
  fn drop(&mut self) {
    for task in &self.tasks {
      task.abort();
    }
  }
}
