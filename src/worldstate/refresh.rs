//! World-state refresh policy.
//!
//! Two cooperating decisions live here: the coarse should-we-poll check the
//! 60-second loop asks, and the debounced corrective refresh armed when
//! timers hit zero, so the view re-polls once the upstream has had time to
//! publish the replacement state.

use std::time::{Duration, Instant};

/// Decides when the world-state endpoint is re-polled.
///
/// One instance per world view; its lifecycle is that view being on screen.
pub struct RefreshPolicy {
  refresh_after: Duration,
  expiry_debounce: Duration,
  last_refresh: Option<Instant>,
  refresh_pending: bool,
  corrective_due: Option<Instant>,
}

impl RefreshPolicy {
  pub fn new(refresh_after: Duration, expiry_debounce: Duration) -> Self {
    Self {
      refresh_after,
      expiry_debounce,
      last_refresh: None,
      refresh_pending: false,
      corrective_due: None,
    }
  }

  /// Whether a coarse poll is due.
  ///
  /// True when no refresh has ever occurred, when more than the refresh
  /// interval has elapsed, or when nothing is meaningfully counting down
  /// (`has_active_timer` false) so polling is cheap and safe. Never true
  /// while a refresh is in flight.
  pub fn should_refresh(&self, now: Instant, has_active_timer: bool) -> bool {
    if self.refresh_pending {
      return false;
    }
    match self.last_refresh {
      None => true,
      Some(at) => now.duration_since(at) > self.refresh_after || !has_active_timer,
    }
  }

  /// A refresh request has been dispatched.
  pub fn mark_pending(&mut self) {
    self.refresh_pending = true;
  }

  /// A refresh completed successfully; fresh data arrived at `now`.
  pub fn record_refresh(&mut self, now: Instant) {
    self.refresh_pending = false;
    self.last_refresh = Some(now);
    // Whatever expiry prompted a corrective refresh has been answered.
    self.corrective_due = None;
  }

  /// A refresh failed; allow the next check to try again.
  pub fn record_failure(&mut self) {
    self.refresh_pending = false;
  }

  /// Timers just expired. Arm one corrective refresh after the debounce
  /// delay, unless one is already armed or a refresh is in flight.
  pub fn note_expired(&mut self, now: Instant) {
    if self.refresh_pending || self.corrective_due.is_some() {
      return;
    }
    self.corrective_due = Some(now + self.expiry_debounce);
  }

  /// Consume the armed corrective refresh once its delay has elapsed.
  pub fn take_due_corrective(&mut self, now: Instant) -> bool {
    match self.corrective_due {
      Some(due) if now >= due && !self.refresh_pending => {
        self.corrective_due = None;
        true
      }
      _ => false,
    }
  }

  pub fn is_pending(&self) -> bool {
    self.refresh_pending
  }
}
