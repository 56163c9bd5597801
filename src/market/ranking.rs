//! Order ranking and filtering for the order-book view.
//!
//! Offline users are dropped, the requested side filter is applied, then
//! each side is sorted and truncated to the rows the view can show. Sorting
//! uses stable sorts only, so ranking the same input twice always produces
//! the same output.

use super::types::{Order, OrderType, UserStatus};

/// How many orders each side of the book shows.
pub const MAX_ROWS_PER_SIDE: usize = 10;

/// Which sides of the book to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
  #[default]
  All,
  Buy,
  Sell,
}

impl OrderFilter {
  pub fn label(self) -> &'static str {
    match self {
      OrderFilter::All => "all",
      OrderFilter::Buy => "buy",
      OrderFilter::Sell => "sell",
    }
  }

  /// Next filter in the toggle cycle.
  pub fn next(self) -> Self {
    match self {
      OrderFilter::All => OrderFilter::Buy,
      OrderFilter::Buy => OrderFilter::Sell,
      OrderFilter::Sell => OrderFilter::All,
    }
  }
}

/// Ranked, truncated order-book sides.
#[derive(Debug, Clone, Default)]
pub struct RankedOrders {
  pub buy: Vec<Order>,
  pub sell: Vec<Order>,
}

/// Rank orders into buy/sell views.
///
/// Buy offers rank by descending platinum, with user status breaking ties
/// (an in-game buyer at the same price outranks a merely online one). Sell
/// offers rank by status first and ascending platinum second: an in-game
/// seller beats a cheaper but absent one.
pub fn rank(orders: &[Order], filter: OrderFilter) -> RankedOrders {
  let mut buy: Vec<Order> = Vec::new();
  let mut sell: Vec<Order> = Vec::new();

  for order in orders {
    if order.user.status == UserStatus::Offline {
      continue;
    }
    match (order.order_type, filter) {
      (OrderType::Buy, OrderFilter::All | OrderFilter::Buy) => buy.push(order.clone()),
      (OrderType::Sell, OrderFilter::All | OrderFilter::Sell) => sell.push(order.clone()),
      _ => {}
    }
  }

  buy.sort_by(|a, b| {
    b.platinum
      .cmp(&a.platinum)
      .then_with(|| b.user.status.priority().cmp(&a.user.status.priority()))
  });
  sell.sort_by(|a, b| {
    b.user
      .status
      .priority()
      .cmp(&a.user.status.priority())
      .then_with(|| a.platinum.cmp(&b.platinum))
  });

  buy.truncate(MAX_ROWS_PER_SIDE);
  sell.truncate(MAX_ROWS_PER_SIDE);

  RankedOrders { buy, sell }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::market::types::OrderUser;

  fn order(name: &str, status: UserStatus, order_type: OrderType, platinum: u32) -> Order {
    Order {
      user: OrderUser {
        ingame_name: name.to_string(),
        status,
      },
      order_type,
      platinum,
      quantity: 1,
    }
  }

  #[test]
  fn test_offline_users_are_dropped() {
    let orders = vec![
      order("a", UserStatus::Offline, OrderType::Sell, 10),
      order("b", UserStatus::Online, OrderType::Sell, 20),
    ];
    let ranked = rank(&orders, OrderFilter::All);
    assert_eq!(ranked.sell.len(), 1);
    assert_eq!(ranked.sell[0].user.ingame_name, "b");
  }

  #[test]
  fn test_buy_filter_returns_only_buy_orders() {
    let orders = vec![
      order("a", UserStatus::Ingame, OrderType::Buy, 10),
      order("b", UserStatus::Ingame, OrderType::Sell, 20),
    ];
    let ranked = rank(&orders, OrderFilter::Buy);
    assert_eq!(ranked.buy.len(), 1);
    assert!(ranked.sell.is_empty());
  }

  #[test]
  fn test_buy_orders_rank_descending_with_status_tiebreak() {
    let orders = vec![
      order("cheap", UserStatus::Ingame, OrderType::Buy, 10),
      order("online_rich", UserStatus::Online, OrderType::Buy, 50),
      order("ingame_rich", UserStatus::Ingame, OrderType::Buy, 50),
    ];
    let ranked = rank(&orders, OrderFilter::Buy);
    let names: Vec<&str> = ranked.buy.iter().map(|o| o.user.ingame_name.as_str()).collect();
    assert_eq!(names, vec!["ingame_rich", "online_rich", "cheap"]);
  }

  #[test]
  fn test_sell_priority_beats_price() {
    let orders = vec![
      order("online", UserStatus::Online, OrderType::Sell, 50),
      order("ingame", UserStatus::Ingame, OrderType::Sell, 60),
    ];
    let ranked = rank(&orders, OrderFilter::Sell);
    let names: Vec<&str> = ranked.sell.iter().map(|o| o.user.ingame_name.as_str()).collect();
    assert_eq!(names, vec!["ingame", "online"]);
  }

  #[test]
  fn test_sell_orders_rank_ascending_within_same_status() {
    let orders = vec![
      order("expensive", UserStatus::Ingame, OrderType::Sell, 90),
      order("cheap", UserStatus::Ingame, OrderType::Sell, 40),
    ];
    let ranked = rank(&orders, OrderFilter::Sell);
    let names: Vec<&str> = ranked.sell.iter().map(|o| o.user.ingame_name.as_str()).collect();
    assert_eq!(names, vec!["cheap", "expensive"]);
  }

  #[test]
  fn test_equal_keys_preserve_input_order() {
    let orders = vec![
      order("first", UserStatus::Online, OrderType::Sell, 30),
      order("second", UserStatus::Online, OrderType::Sell, 30),
      order("third", UserStatus::Online, OrderType::Sell, 30),
    ];
    let ranked = rank(&orders, OrderFilter::Sell);
    let names: Vec<&str> = ranked.sell.iter().map(|o| o.user.ingame_name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
  }

  #[test]
  fn test_each_side_truncates_to_ten() {
    let orders: Vec<Order> = (0..25)
      .map(|i| order(&format!("u{i}"), UserStatus::Online, OrderType::Sell, 10 + i))
      .collect();
    let ranked = rank(&orders, OrderFilter::All);
    assert_eq!(ranked.sell.len(), MAX_ROWS_PER_SIDE);
    assert_eq!(ranked.sell[0].platinum, 10);
  }

  #[test]
  fn test_ranking_is_deterministic() {
    let orders = vec![
      order("a", UserStatus::Online, OrderType::Sell, 30),
      order("b", UserStatus::Ingame, OrderType::Sell, 30),
      order("c", UserStatus::Online, OrderType::Buy, 30),
      order("d", UserStatus::Ingame, OrderType::Buy, 45),
    ];
    let first = rank(&orders, OrderFilter::All);
    for _ in 0..10 {
      let again = rank(&orders, OrderFilter::All);
      let names =
        |side: &[Order]| side.iter().map(|o| o.user.ingame_name.clone()).collect::<Vec<_>>();
      assert_eq!(names(&first.buy), names(&again.buy));
      assert_eq!(names(&first.sell), names(&again.sell));
    }
  }
}
