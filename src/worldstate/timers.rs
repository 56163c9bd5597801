//! Countdown timer registry for world-state entities.
//!
//! The registry is the single source of truth for remaining seconds between
//! refreshes: `tick` drives the on-screen countdown once per second, and a
//! completing refresh reconciles through `upsert` under a tolerance instead
//! of overwriting, so normal polling jitter never makes a visible timer jump.

use std::collections::{BTreeMap, HashSet};

/// What kind of world-state entity a timer tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
  Cycle,
  Alert,
  Fissure,
  Invasion,
  Sortie,
}

/// Display metadata attached to a timer on upsert.
#[derive(Debug, Clone, Default)]
pub struct TimerMeta {
  /// Primary display text, e.g. the node name
  pub label: String,
  /// Secondary display text, e.g. reward or tier
  pub detail: String,
  /// Phase marker; a change here (e.g. day -> night) is a genuine state
  /// transition and always resets the countdown
  pub state_tag: String,
}

/// One tracked countdown.
#[derive(Debug, Clone)]
pub struct TrackedTimer {
  pub id: String,
  pub kind: TimerKind,
  pub remaining_secs: u64,
  pub label: String,
  pub detail: String,
  pub state_tag: String,
  pub expired: bool,
  /// Expiry has already been reported through a `TickReport`
  notified: bool,
}

/// Outcome of one `tick` pass.
#[derive(Debug, Default)]
pub struct TickReport {
  /// Timers that hit zero on this tick and had not been reported before
  pub newly_expired: Vec<String>,
}

impl TickReport {
  /// True when this tick made the set of expired timers grow.
  pub fn expiry_edge(&self) -> bool {
    !self.newly_expired.is_empty()
  }
}

/// Registry of countdown timers, keyed by entity id.
///
/// A `BTreeMap` keeps iteration order stable so repeated renders of the
/// same state list timers identically.
pub struct TimerRegistry {
  timers: BTreeMap<String, TrackedTimer>,
  tolerance_secs: u64,
}

impl TimerRegistry {
  /// `tolerance_secs` is the reconciliation window: an authoritative value
  /// within this distance of the locally ticked one is ignored.
  pub fn new(tolerance_secs: u64) -> Self {
    Self {
      timers: BTreeMap::new(),
      tolerance_secs,
    }
  }

  /// Create or reconcile a timer from refreshed authoritative data.
  ///
  /// An existing timer keeps its locally ticked count unless the state tag
  /// changed (a genuine phase transition) or the authoritative value
  /// disagrees by more than the tolerance. Display metadata is always
  /// refreshed.
  pub fn upsert(&mut self, id: &str, kind: TimerKind, authoritative_secs: u64, meta: TimerMeta) {
    match self.timers.get_mut(id) {
      None => {
        let expired = authoritative_secs == 0;
        self.timers.insert(
          id.to_string(),
          TrackedTimer {
            id: id.to_string(),
            kind,
            remaining_secs: authoritative_secs,
            label: meta.label,
            detail: meta.detail,
            state_tag: meta.state_tag,
            expired,
            // A timer born at zero never counted down here; reporting it
            // as newly expired would trigger refreshes in a loop.
            notified: expired,
          },
        );
      }
      Some(timer) => {
        let transitioned = timer.state_tag != meta.state_tag;
        let drifted = timer.remaining_secs.abs_diff(authoritative_secs) > self.tolerance_secs;

        if transitioned || drifted {
          timer.remaining_secs = authoritative_secs;
          timer.expired = authoritative_secs == 0;
          timer.notified = timer.expired;
        }

        timer.label = meta.label;
        timer.detail = meta.detail;
        timer.state_tag = meta.state_tag;
      }
    }
  }

  /// Advance every timer by one second.
  ///
  /// Timers at zero stay at zero. A timer reaching zero is flagged expired
  /// and reported exactly once; subsequent ticks do not re-report it.
  pub fn tick(&mut self) -> TickReport {
    let mut report = TickReport::default();

    for timer in self.timers.values_mut() {
      if timer.remaining_secs > 0 {
        timer.remaining_secs -= 1;
      }
      if timer.remaining_secs == 0 {
        timer.expired = true;
        if !timer.notified {
          timer.notified = true;
          report.newly_expired.push(timer.id.clone());
        }
      }
    }

    report
  }

  pub fn get(&self, id: &str) -> Option<&TrackedTimer> {
    self.timers.get(id)
  }

  pub fn remove(&mut self, id: &str) {
    self.timers.remove(id);
  }

  /// Drop every timer whose id a fresh refresh no longer reports.
  pub fn retain_ids(&mut self, keep: &HashSet<String>) {
    self.timers.retain(|id, _| keep.contains(id));
  }

  /// Timers of one kind, in stable order.
  pub fn of_kind(&self, kind: TimerKind) -> Vec<&TrackedTimer> {
    self.timers.values().filter(|t| t.kind == kind).collect()
  }

  /// True when some timer is actively and meaningfully counting down,
  /// i.e. `0 < remaining < horizon_secs`.
  pub fn has_active_below(&self, horizon_secs: u64) -> bool {
    self
      .timers
      .values()
      .any(|t| t.remaining_secs > 0 && t.remaining_secs < horizon_secs)
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  const TOLERANCE: u64 = 120;

  fn meta(tag: &str) -> TimerMeta {
    TimerMeta {
      label: "Cambria (Earth)".to_string(),
      detail: "Nitain Extract".to_string(),
      state_tag: tag.to_string(),
    }
  }

  fn registry_with(id: &str, secs: u64) -> TimerRegistry {
    let mut registry = TimerRegistry::new(TOLERANCE);
    registry.upsert(id, TimerKind::Alert, secs, meta(""));
    registry
  }

  #[test]
  fn test_tick_is_monotonically_non_increasing() {
    let mut registry = registry_with("a", 5);
    let mut last = 5;
    for _ in 0..10 {
      registry.tick();
      let remaining = registry.get("a").unwrap().remaining_secs;
      assert!(remaining <= last);
      last = remaining;
    }
    assert_eq!(last, 0);
  }

  #[test]
  fn test_timer_at_zero_stays_at_zero() {
    let mut registry = registry_with("a", 1);
    registry.tick();
    registry.tick();
    registry.tick();
    assert_eq!(registry.get("a").unwrap().remaining_secs, 0);
    assert!(registry.get("a").unwrap().expired);
  }

  #[test]
  fn test_expiry_reported_exactly_once() {
    let mut registry = registry_with("a", 2);
    assert!(!registry.tick().expiry_edge());
    let report = registry.tick();
    assert_eq!(report.newly_expired, vec!["a".to_string()]);
    for _ in 0..5 {
      assert!(!registry.tick().expiry_edge());
    }
  }

  #[test]
  fn test_upsert_within_tolerance_keeps_local_value() {
    let mut registry = registry_with("a", 600);
    for _ in 0..10 {
      registry.tick();
    }
    registry.upsert("a", TimerKind::Alert, 600, meta(""));
    assert_eq!(registry.get("a").unwrap().remaining_secs, 590);

    registry.upsert("a", TimerKind::Alert, 590 + TOLERANCE, meta(""));
    assert_eq!(registry.get("a").unwrap().remaining_secs, 590);
  }

  #[test]
  fn test_upsert_beyond_tolerance_overwrites() {
    let mut registry = registry_with("a", 600);
    registry.upsert("a", TimerKind::Alert, 600 + TOLERANCE + 1, meta(""));
    assert_eq!(registry.get("a").unwrap().remaining_secs, 721);
  }

  #[test]
  fn test_state_transition_always_resets() {
    let mut registry = TimerRegistry::new(TOLERANCE);
    registry.upsert("cycle:earth", TimerKind::Cycle, 30, meta("day"));
    for _ in 0..30 {
      registry.tick();
    }
    assert!(registry.get("cycle:earth").unwrap().expired);

    // Same magnitude would be within tolerance, but the phase flipped.
    registry.upsert("cycle:earth", TimerKind::Cycle, 90, meta("night"));
    let timer = registry.get("cycle:earth").unwrap();
    assert_eq!(timer.remaining_secs, 90);
    assert!(!timer.expired);
  }

  #[test]
  fn test_reset_timer_can_expire_again() {
    let mut registry = registry_with("a", 1);
    assert!(registry.tick().expiry_edge());
    registry.upsert("a", TimerKind::Alert, 300, meta("respawned"));
    let mut edges = 0;
    for _ in 0..300 {
      if registry.tick().expiry_edge() {
        edges += 1;
      }
    }
    assert_eq!(edges, 1);
  }

  #[test]
  fn test_timer_born_expired_is_not_reported() {
    let mut registry = registry_with("a", 0);
    assert!(!registry.tick().expiry_edge());
    assert!(registry.get("a").unwrap().expired);
  }

  #[test]
  fn test_retain_ids_prunes_unreported_entities() {
    let mut registry = TimerRegistry::new(TOLERANCE);
    registry.upsert("a", TimerKind::Fissure, 100, meta(""));
    registry.upsert("b", TimerKind::Fissure, 100, meta(""));
    let keep: HashSet<String> = ["b".to_string()].into_iter().collect();
    registry.retain_ids(&keep);
    assert!(registry.get("a").is_none());
    assert!(registry.get("b").is_some());
  }

  #[test]
  fn test_has_active_below_horizon() {
    let mut registry = TimerRegistry::new(TOLERANCE);
    registry.upsert("far", TimerKind::Sortie, 50_000, meta(""));
    assert!(!registry.has_active_below(7200));

    registry.upsert("near", TimerKind::Alert, 300, meta(""));
    assert!(registry.has_active_below(7200));

    registry.remove("near");
    registry.upsert("done", TimerKind::Alert, 0, meta(""));
    assert!(!registry.has_active_below(7200));
  }

  #[test]
  fn test_metadata_refreshes_without_touching_countdown() {
    let mut registry = registry_with("a", 600);
    registry.tick();
    let mut updated = meta("");
    updated.detail = "Orokin Catalyst Blueprint".to_string();
    registry.upsert("a", TimerKind::Alert, 600, updated);
    let timer = registry.get("a").unwrap();
    assert_eq!(timer.remaining_secs, 599);
    assert_eq!(timer.detail, "Orokin Catalyst Blueprint");
  }
}
