use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tracing::warn;

use crate::db::Database;
use crate::market::client::MarketClient;
use crate::market::types::Item;
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::OrderBookView;

/// Item search view: recent searches by default, catalog matches after a
/// search is submitted.
pub struct MarketSearchView {
  market: MarketClient,
  db: Arc<Database>,
  /// Active catalog search, None while showing recent searches
  results: Option<Query<Vec<Item>>>,
  last_query: String,
  recent: Vec<Item>,
  list_state: ListState,
  search: SearchInput,
}

impl MarketSearchView {
  pub fn new(market: MarketClient, db: Arc<Database>) -> Self {
    let recent = db.load_recent().unwrap_or_else(|e| {
      warn!(error = %e, "failed to load recent searches");
      Vec::new()
    });

    Self {
      market,
      db,
      results: None,
      last_query: String::new(),
      recent,
      list_state: ListState::default(),
      search: SearchInput::new(),
    }
  }

  fn start_search(&mut self, raw_query: String) {
    let query = raw_query.trim().to_string();
    if query.is_empty() {
      self.results = None;
      return;
    }

    self.last_query = query.clone();
    let market = self.market.clone();
    let mut results = Query::new(move || {
      let market = market.clone();
      let query = query.clone();
      async move { market.search_items(&query).await.map_err(|e| e.to_string()) }
    });
    results.fetch();
    self.results = Some(results);
    self.list_state = ListState::default();
  }

  /// Items currently listed: search results when a search ran, recent
  /// searches otherwise.
  fn listed_items(&self) -> &[Item] {
    match &self.results {
      Some(query) => query.data().map(|v| v.as_slice()).unwrap_or(&[]),
      None => &self.recent,
    }
  }

  fn open_selected(&mut self) -> ViewAction {
    let Some(selected) = self.list_state.selected() else {
      return ViewAction::None;
    };
    let Some(item) = self.listed_items().get(selected).cloned() else {
      return ViewAction::None;
    };

    if let Err(e) = self.db.push_recent(&item) {
      warn!(error = %e, "failed to record recent search");
    }
    if let Ok(recent) = self.db.load_recent() {
      self.recent = recent;
    }

    ViewAction::Push(Box::new(OrderBookView::new(item, self.market.clone())))
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.listed_items().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match &self.results {
      Some(query) => match query.state() {
        QueryState::Loading => format!(" Items matching \"{}\" (loading...) ", self.last_query),
        QueryState::Error(_) => format!(" Items matching \"{}\" ", self.last_query),
        _ => format!(" Items matching \"{}\" ({}) ", self.last_query, len),
      },
      None => format!(" Recent searches ({}) ", len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(error) = self.results.as_ref().and_then(|q| q.error()) {
      let paragraph = Paragraph::new(format!(
        "{}\n\nPress '/' to search again or 'r' to retry.",
        error
      ))
      .block(block)
      .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
      return;
    }

    if len == 0 {
      let content = match &self.results {
        Some(query) if query.is_loading() => "Searching...",
        _ => "No recent searches. Press '/' to search the market.",
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .listed_items()
      .iter()
      .map(|item| ListItem::new(Line::from(item.name.clone())))
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for MarketSearchView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let the search overlay try to handle first
    match self.search.handle_key(key) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(SearchEvent::Submitted(query)) => {
        self.start_search(query);
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        ViewAction::None
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        ViewAction::None
      }
      KeyCode::Enter => self.open_selected(),
      KeyCode::Char('r') => {
        if !self.last_query.is_empty() {
          self.start_search(self.last_query.clone());
        }
        ViewAction::None
      }
      KeyCode::Esc if self.results.is_some() => {
        // Back to the recent-searches list
        self.results = None;
        self.list_state = ListState::default();
        ViewAction::None
      }
      _ => ViewAction::NotHandled,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Market".to_string()
  }

  fn tick(&mut self) {
    if let Some(query) = &mut self.results {
      query.poll();
    }
  }
}
