use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::market::client::MarketClient;
use crate::market::ranking::{rank, OrderFilter, RankedOrders};
use crate::market::types::{Item, Order};
use crate::query::{Query, QueryState};
use crate::ui::render::order_row;
use crate::ui::renderfns::row_to_line;
use crate::ui::view::{View, ViewAction};

/// Column widths: user, status, quantity
const ORDER_WIDTHS: &[usize] = &[18, 8, 4];

/// Buy/sell panels for one item's order book
pub struct OrderBookView {
  item: Item,
  query: Query<Vec<Order>>,
  filter: OrderFilter,
}

impl OrderBookView {
  pub fn new(item: Item, market: MarketClient) -> Self {
    let url_name = item.url_name.clone();
    let mut query = Query::new(move || {
      let market = market.clone();
      let url_name = url_name.clone();
      async move { market.orders(&url_name).await.map_err(|e| e.to_string()) }
    });

    // Start fetching immediately
    query.fetch();

    Self {
      item,
      query,
      filter: OrderFilter::default(),
    }
  }

  fn ranked(&self) -> RankedOrders {
    match self.query.data() {
      Some(orders) => rank(orders, self.filter),
      None => RankedOrders::default(),
    }
  }

  fn render_side(&self, frame: &mut Frame, area: Rect, title: &str, orders: &[Order]) {
    let block = Block::default()
      .title(format!(" {} ({}) ", title, orders.len()))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if orders.is_empty() {
      let content = if self.query.is_loading() {
        "Loading orders..."
      } else {
        "No orders."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = orders
      .iter()
      .map(|order| ListItem::new(row_to_line(&order_row(order), ORDER_WIDTHS)))
      .collect();

    frame.render_widget(List::new(items).block(block), area);
  }
}

impl View for OrderBookView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('f') | KeyCode::Tab => {
        self.filter = self.filter.next();
        ViewAction::None
      }
      KeyCode::Char('r') => {
        self.query.refetch();
        ViewAction::None
      }
      _ => ViewAction::NotHandled,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let header = match self.query.state() {
      QueryState::Loading => format!(" {} (loading...) ", self.item.name),
      QueryState::Error(e) => format!(" {} (error: {}) ", self.item.name, e),
      _ => format!(" {} [filter: {}] ", self.item.name, self.filter.label()),
    };

    let outer = Block::default()
      .title(header)
      .title_alignment(Alignment::Center)
      .borders(Borders::TOP);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if let Some(error) = self.query.error() {
      let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }

    let ranked = self.ranked();
    let chunks = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
      .split(inner);

    self.render_side(frame, chunks[0], "Buy offers", &ranked.buy);
    self.render_side(frame, chunks[1], "Sell offers", &ranked.sell);
  }

  fn breadcrumb_label(&self) -> String {
    self.item.name.clone()
  }

  fn tick(&mut self) {
    self.query.poll();
  }
}
