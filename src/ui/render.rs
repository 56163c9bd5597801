//! Pure render instructions.
//!
//! Everything here maps domain and timer state to plain data - text plus a
//! semantic tone - with no ratatui types involved. The views apply these
//! instructions to widgets, keeping the displayable logic testable without
//! a terminal.

use crate::market::types::{Order, UserStatus};
use crate::worldstate::timers::TrackedTimer;
use crate::worldstate::types::Invasion;

/// Semantic display tone; the view layer maps these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Default,
  Accent,
  Good,
  Warn,
  Bad,
  Dim,
}

/// One rendered cell: text and its tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
  pub text: String,
  pub tone: Tone,
}

impl Cell {
  pub fn new(text: impl Into<String>, tone: Tone) -> Self {
    Self {
      text: text.into(),
      tone,
    }
  }
}

/// A row of cells for a list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
  pub cells: Vec<Cell>,
}

/// Countdown under this many seconds renders in the warning tone.
const WARN_BELOW_SECS: u64 = 300;

/// Format remaining seconds as a compact clock.
pub fn fmt_remaining(secs: u64) -> String {
  if secs == 0 {
    return "expired".to_string();
  }
  let h = secs / 3600;
  let m = (secs % 3600) / 60;
  let s = secs % 60;
  if h > 0 {
    format!("{}h {:02}m {:02}s", h, m, s)
  } else if m > 0 {
    format!("{}m {:02}s", m, s)
  } else {
    format!("{}s", s)
  }
}

pub fn status_tone(status: UserStatus) -> Tone {
  match status {
    UserStatus::Ingame => Tone::Good,
    UserStatus::Online => Tone::Accent,
    UserStatus::Offline => Tone::Dim,
  }
}

/// Row for one order-book entry.
pub fn order_row(order: &Order) -> RowSpec {
  RowSpec {
    cells: vec![
      Cell::new(order.user.ingame_name.clone(), Tone::Default),
      Cell::new(order.user.status.label(), status_tone(order.user.status)),
      Cell::new(format!("x{}", order.quantity), Tone::Dim),
      Cell::new(format!("{}p", order.platinum), Tone::Accent),
    ],
  }
}

/// Row for one tracked countdown.
pub fn timer_row(timer: &TrackedTimer) -> RowSpec {
  let (text, tone) = if timer.expired || timer.remaining_secs == 0 {
    ("expired".to_string(), Tone::Bad)
  } else if timer.remaining_secs < WARN_BELOW_SECS {
    (fmt_remaining(timer.remaining_secs), Tone::Warn)
  } else {
    (fmt_remaining(timer.remaining_secs), Tone::Default)
  };

  RowSpec {
    cells: vec![
      Cell::new(timer.label.clone(), Tone::Default),
      Cell::new(timer.detail.clone(), Tone::Dim),
      Cell::new(text, tone),
    ],
  }
}

/// Row for one invasion; the countdown cell is present only when the
/// registry tracks an ETA for it.
pub fn invasion_row(invasion: &Invasion, remaining: Option<&TrackedTimer>) -> RowSpec {
  let mut cells = vec![
    Cell::new(invasion.node.clone(), Tone::Default),
    Cell::new(
      format!("{} vs {}", invasion.attacker, invasion.defender),
      Tone::Dim,
    ),
    Cell::new(format!("{:.0}%", invasion.completion), Tone::Accent),
  ];
  if let Some(timer) = remaining {
    let tail = timer_row(timer);
    if let Some(clock) = tail.cells.into_iter().last() {
      cells.push(clock);
    }
  }
  RowSpec { cells }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::market::types::{OrderType, OrderUser};
  use crate::worldstate::timers::{TimerKind, TimerMeta, TimerRegistry};

  #[test]
  fn test_fmt_remaining() {
    assert_eq!(fmt_remaining(0), "expired");
    assert_eq!(fmt_remaining(42), "42s");
    assert_eq!(fmt_remaining(65), "1m 05s");
    assert_eq!(fmt_remaining(3600), "1h 00m 00s");
    assert_eq!(fmt_remaining(7384), "2h 03m 04s");
  }

  #[test]
  fn test_order_row_tones_follow_status() {
    let order = Order {
      user: OrderUser {
        ingame_name: "tenno".to_string(),
        status: UserStatus::Ingame,
      },
      order_type: OrderType::Sell,
      platinum: 60,
      quantity: 2,
    };
    let row = order_row(&order);
    assert_eq!(row.cells[1].tone, Tone::Good);
    assert_eq!(row.cells[2].text, "x2");
    assert_eq!(row.cells[3].text, "60p");
  }

  fn timer_with(secs: u64) -> TrackedTimer {
    let mut registry = TimerRegistry::new(120);
    registry.upsert(
      "t",
      TimerKind::Alert,
      secs,
      TimerMeta {
        label: "Cambria (Earth)".to_string(),
        detail: "Nitain Extract".to_string(),
        state_tag: String::new(),
      },
    );
    registry.get("t").unwrap().clone()
  }

  #[test]
  fn test_timer_row_warns_near_expiry() {
    assert_eq!(timer_row(&timer_with(3600)).cells[2].tone, Tone::Default);
    assert_eq!(timer_row(&timer_with(120)).cells[2].tone, Tone::Warn);
  }

  #[test]
  fn test_expired_timer_row_is_flagged() {
    let row = timer_row(&timer_with(0));
    assert_eq!(row.cells[2].text, "expired");
    assert_eq!(row.cells[2].tone, Tone::Bad);
  }

  #[test]
  fn test_invasion_row_without_eta_has_no_clock() {
    let invasion = Invasion {
      id: "inv".to_string(),
      node: "Spear (Mars)".to_string(),
      attacker: "Grineer".to_string(),
      defender: "Corpus".to_string(),
      completion: 42.6,
      eta_secs: None,
    };
    let row = invasion_row(&invasion, None);
    assert_eq!(row.cells.len(), 3);
    assert_eq!(row.cells[2].text, "43%");
  }
}
