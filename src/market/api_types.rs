//! Serde-deserializable types matching Warframe Market API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs. Every field is
//! defaulted: the API is treated permissively and unknown or missing fields
//! must never fail a whole response.

use serde::Deserialize;

use super::types::{Item, Order, OrderType, OrderUser, UserStatus};

/// Most endpoints wrap their body in `{ "payload": ... }`.
#[derive(Debug, Deserialize)]
pub struct ApiPayload<T> {
  pub payload: T,
}

// ============================================================================
// GET /items
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ApiItemsBody {
  #[serde(default)]
  pub items: Vec<ApiItem>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiItem {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub item_name: String,
  #[serde(default)]
  pub url_name: String,
}

// ============================================================================
// GET /items/{url_name}/orders
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ApiOrdersBody {
  #[serde(default)]
  pub orders: Vec<ApiOrder>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiOrder {
  #[serde(default)]
  pub order_type: String,
  #[serde(default)]
  pub platinum: u32,
  #[serde(default = "default_quantity")]
  pub quantity: u32,
  #[serde(default = "default_visible")]
  pub visible: bool,
  #[serde(default)]
  pub user: ApiOrderUser,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiOrderUser {
  #[serde(default)]
  pub ingame_name: String,
  #[serde(default)]
  pub status: String,
}

fn default_quantity() -> u32 {
  1
}

fn default_visible() -> bool {
  true
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl ApiItem {
  pub fn into_domain(self) -> Item {
    Item {
      id: self.id,
      name: self.item_name,
      url_name: self.url_name,
    }
  }
}

impl ApiOrder {
  /// Convert to a domain order. Hidden orders and orders whose type string
  /// is unrecognized are dropped rather than guessed at.
  pub fn into_domain(self) -> Option<Order> {
    if !self.visible {
      return None;
    }
    let order_type = match self.order_type.to_lowercase().as_str() {
      "buy" => OrderType::Buy,
      "sell" => OrderType::Sell,
      _ => return None,
    };
    Some(Order {
      order_type,
      platinum: self.platinum,
      quantity: self.quantity,
      user: OrderUser {
        ingame_name: self.user.ingame_name,
        status: UserStatus::parse(&self.user.status),
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_items_payload_parses() {
    let body = json!({
      "payload": {
        "items": [
          {"id": "54a74454e779892d5e5155d5", "item_name": "Maiming Strike", "url_name": "maiming_strike", "thumb": "icons/x.png"}
        ]
      }
    });
    let parsed: ApiPayload<ApiItemsBody> = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.payload.items.len(), 1);
    let item = parsed.payload.items.into_iter().next().unwrap().into_domain();
    assert_eq!(item.name, "Maiming Strike");
    assert_eq!(item.url_name, "maiming_strike");
  }

  #[test]
  fn test_missing_optional_fields_do_not_fail() {
    let body = json!({"payload": {"orders": [{"order_type": "sell", "platinum": 15}]}});
    let parsed: ApiPayload<ApiOrdersBody> = serde_json::from_value(body).unwrap();
    let order = parsed.payload.orders.into_iter().next().unwrap();
    let order = order.into_domain().unwrap();
    assert_eq!(order.platinum, 15);
    assert_eq!(order.quantity, 1);
    assert_eq!(order.user.status, UserStatus::Offline);
  }

  #[test]
  fn test_hidden_and_unknown_type_orders_are_dropped() {
    let hidden = ApiOrder {
      order_type: "sell".into(),
      visible: false,
      ..Default::default()
    };
    assert!(hidden.into_domain().is_none());

    let unknown = ApiOrder {
      order_type: "loan".into(),
      visible: true,
      ..Default::default()
    };
    assert!(unknown.into_domain().is_none());
  }

  #[test]
  fn test_status_parsing_is_permissive() {
    assert_eq!(UserStatus::parse("ingame"), UserStatus::Ingame);
    assert_eq!(UserStatus::parse("In Game"), UserStatus::Ingame);
    assert_eq!(UserStatus::parse("ONLINE"), UserStatus::Online);
    assert_eq!(UserStatus::parse("afk?"), UserStatus::Offline);
    assert_eq!(UserStatus::parse(""), UserStatus::Offline);
  }
}
