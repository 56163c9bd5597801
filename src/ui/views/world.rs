use std::collections::HashSet;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use tracing::{debug, warn};

use crate::config::Tuning;
use crate::query::{Query, QueryState};
use crate::ui::render::{invasion_row, timer_row};
use crate::ui::renderfns::row_to_line;
use crate::ui::view::{View, ViewAction};
use crate::worldstate::client::WorldstateClient;
use crate::worldstate::refresh::RefreshPolicy;
use crate::worldstate::scheduler::{Scheduler, WorldTick};
use crate::worldstate::timers::{TimerKind, TimerMeta, TimerRegistry};
use crate::worldstate::types::WorldSnapshot;

/// Column widths for timer rows: label, detail
const TIMER_WIDTHS: &[usize] = &[22, 34];

/// World-state view: cycles, alerts, fissures, invasions and the sortie,
/// with locally ticking countdowns.
///
/// The view owns the registry, the refresh policy and the scheduler; all
/// three live exactly as long as the view is on screen. Dropping the view
/// (switching away) stops both periodic loops with it, and a new view
/// starts fresh ones and forces an immediate refresh.
pub struct WorldView {
  query: Query<WorldSnapshot>,
  registry: TimerRegistry,
  policy: RefreshPolicy,
  scheduler: Scheduler,
  horizon_secs: u64,
  /// Last applied snapshot; invasions and the sortie render from it
  snapshot: Option<WorldSnapshot>,
}

impl WorldView {
  pub fn new(client: WorldstateClient, tuning: &Tuning) -> Self {
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.snapshot().await.map_err(|e| e.to_string()) }
    });

    let mut policy = RefreshPolicy::new(
      Duration::from_secs(tuning.refresh_after_secs),
      Duration::from_secs(tuning.expiry_debounce_secs),
    );

    // Entering the view forces one immediate refresh.
    policy.mark_pending();
    query.fetch();

    Self {
      query,
      registry: TimerRegistry::new(tuning.reconcile_tolerance_secs),
      policy,
      scheduler: Scheduler::start(),
      horizon_secs: tuning.active_timer_horizon_secs,
      snapshot: None,
    }
  }

  fn start_refresh(&mut self) {
    self.policy.mark_pending();
    self.query.refetch();
  }

  /// Fold a fresh snapshot into the timer registry.
  ///
  /// Every reported entity is upserted (the registry decides whether the
  /// authoritative value actually moves the countdown) and everything the
  /// snapshot stopped reporting is pruned.
  fn reconcile(&mut self, snapshot: &WorldSnapshot) {
    let mut keep: HashSet<String> = HashSet::new();

    for cycle in &snapshot.cycles {
      let id = format!("cycle:{}", cycle.name);
      self.registry.upsert(
        &id,
        TimerKind::Cycle,
        cycle.remaining_secs,
        TimerMeta {
          label: cycle_title(&cycle.name).to_string(),
          detail: cycle.state.clone(),
          state_tag: cycle.state.clone(),
        },
      );
      keep.insert(id);
    }

    for alert in &snapshot.alerts {
      self.registry.upsert(
        &alert.id,
        TimerKind::Alert,
        alert.remaining_secs,
        TimerMeta {
          label: alert.node.clone(),
          detail: format!("{} - {}", alert.mission_type, alert.reward),
          state_tag: String::new(),
        },
      );
      keep.insert(alert.id.clone());
    }

    for fissure in &snapshot.fissures {
      let mut detail = format!("{} {}", fissure.tier, fissure.mission_type);
      if fissure.hard {
        detail.push_str(" [SP]");
      }
      if fissure.storm {
        detail.push_str(" [Storm]");
      }
      self.registry.upsert(
        &fissure.id,
        TimerKind::Fissure,
        fissure.remaining_secs,
        TimerMeta {
          label: fissure.node.clone(),
          detail,
          state_tag: fissure.tier.clone(),
        },
      );
      keep.insert(fissure.id.clone());
    }

    for invasion in &snapshot.invasions {
      // Invasions have no fixed expiry; only track the ones the upstream
      // gives an ETA for.
      if let Some(eta) = invasion.eta_secs {
        self.registry.upsert(
          &invasion.id,
          TimerKind::Invasion,
          eta,
          TimerMeta {
            label: invasion.node.clone(),
            detail: format!("{} vs {}", invasion.attacker, invasion.defender),
            state_tag: String::new(),
          },
        );
        keep.insert(invasion.id.clone());
      }
    }

    if let Some(sortie) = &snapshot.sortie {
      self.registry.upsert(
        "sortie",
        TimerKind::Sortie,
        sortie.remaining_secs,
        TimerMeta {
          label: sortie.boss.clone(),
          detail: sortie.faction.clone(),
          state_tag: String::new(),
        },
      );
      keep.insert("sortie".to_string());
    }

    self.registry.retain_ids(&keep);
    self.snapshot = Some(snapshot.clone());
  }

  fn on_second(&mut self) {
    let report = self.registry.tick();
    let now = Instant::now();
    if report.expiry_edge() {
      debug!(expired = ?report.newly_expired, "timers expired, arming corrective refresh");
      self.policy.note_expired(now);
    }
    if self.policy.take_due_corrective(now) {
      debug!("corrective refresh firing");
      self.start_refresh();
    }
  }

  fn on_refresh_check(&mut self) {
    let now = Instant::now();
    let active = self.registry.has_active_below(self.horizon_secs);
    if self.policy.should_refresh(now, active) {
      debug!(active, "refresh policy due, re-polling world state");
      self.start_refresh();
    }
  }

  fn render_timer_section(
    &self,
    frame: &mut Frame,
    area: Rect,
    title: &str,
    kind: TimerKind,
    status: Option<&str>,
  ) {
    let timers = self.registry.of_kind(kind);
    let full_title = match status {
      Some(s) => format!(" {} ({}) {} ", title, timers.len(), s),
      None => format!(" {} ({}) ", title, timers.len()),
    };

    let block = Block::default()
      .title(full_title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if timers.is_empty() {
      let paragraph = Paragraph::new("None active.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = timers
      .iter()
      .map(|timer| ListItem::new(row_to_line(&timer_row(timer), TIMER_WIDTHS)))
      .collect();

    frame.render_widget(List::new(items).block(block), area);
  }

  fn render_invasions(&self, frame: &mut Frame, area: Rect) {
    let invasions = self
      .snapshot
      .as_ref()
      .map(|s| s.invasions.as_slice())
      .unwrap_or(&[]);

    let block = Block::default()
      .title(format!(" Invasions ({}) ", invasions.len()))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if invasions.is_empty() {
      let paragraph = Paragraph::new("None active.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = invasions
      .iter()
      .map(|invasion| {
        let timer = self.registry.get(&invasion.id);
        ListItem::new(row_to_line(&invasion_row(invasion, timer), TIMER_WIDTHS))
      })
      .collect();

    frame.render_widget(List::new(items).block(block), area);
  }

  fn render_sortie(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" Sortie ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let Some(sortie) = self.snapshot.as_ref().and_then(|s| s.sortie.as_ref()) else {
      let paragraph = Paragraph::new("No sortie data.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    };

    let mut lines = Vec::new();
    if let Some(timer) = self.registry.get("sortie") {
      lines.push(row_to_line(&timer_row(timer), TIMER_WIDTHS));
    }
    for mission in &sortie.missions {
      lines.push(Line::from(vec![
        Span::styled(
          format!("  {:<20} ", mission.node),
          Style::default().fg(Color::White),
        ),
        Span::styled(
          format!("{:<12} ", mission.mission_type),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(
          mission.modifier.clone(),
          Style::default().fg(Color::DarkGray),
        ),
      ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }

  fn refresh_status(&self) -> Option<String> {
    match self.query.state() {
      QueryState::Error(e) => Some(format!("(refresh failed: {})", e)),
      _ if self.query.is_fetching() => Some("(refreshing...)".to_string()),
      _ => None,
    }
  }
}

/// Display names for the fixed cycle keys
fn cycle_title(name: &str) -> &str {
  match name {
    "earth" => "Earth",
    "cetus" => "Cetus",
    "vallis" => "Orb Vallis",
    "cambion" => "Cambion Drift",
    other => other,
  }
}

impl View for WorldView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => {
        if !self.policy.is_pending() {
          self.start_refresh();
        }
        ViewAction::None
      }
      _ => ViewAction::NotHandled,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(6),  // Cycles
        Constraint::Length(6),  // Alerts
        Constraint::Min(6),     // Fissures
        Constraint::Length(6),  // Invasions
        Constraint::Length(6),  // Sortie
      ])
      .split(area);

    let status = self.refresh_status();
    self.render_timer_section(frame, chunks[0], "Cycles", TimerKind::Cycle, status.as_deref());
    self.render_timer_section(frame, chunks[1], "Alerts", TimerKind::Alert, None);
    self.render_timer_section(frame, chunks[2], "Fissures", TimerKind::Fissure, None);
    self.render_invasions(frame, chunks[3]);
    self.render_sortie(frame, chunks[4]);
  }

  fn breadcrumb_label(&self) -> String {
    "World".to_string()
  }

  fn tick(&mut self) {
    // Apply a completed refresh before advancing the countdowns.
    if self.query.poll() {
      if let Some(snapshot) = self.query.data().cloned() {
        self.reconcile(&snapshot);
        self.policy.record_refresh(Instant::now());
      } else if let Some(error) = self.query.error() {
        warn!(error, "world-state refresh failed");
        self.policy.record_failure();
      }
    }

    while let Some(signal) = self.scheduler.try_next() {
      match signal {
        WorldTick::Second => self.on_second(),
        WorldTick::RefreshCheck => self.on_refresh_check(),
      }
    }
  }
}
