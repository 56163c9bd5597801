/// Catalog entry from the market item index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
  pub id: String,
  pub name: String,
  pub url_name: String,
}

/// Presence of the user behind an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
  Ingame,
  Online,
  Offline,
}

impl UserStatus {
  /// Parse an API status string; anything unrecognized counts as offline.
  pub fn parse(raw: &str) -> Self {
    match raw.trim().to_lowercase().as_str() {
      "ingame" | "in game" => UserStatus::Ingame,
      "online" => UserStatus::Online,
      _ => UserStatus::Offline,
    }
  }

  /// Ranking priority: in-game sellers are the ones you can actually trade
  /// with right now.
  pub fn priority(self) -> u8 {
    match self {
      UserStatus::Ingame => 2,
      UserStatus::Online => 1,
      UserStatus::Offline => 0,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      UserStatus::Ingame => "ingame",
      UserStatus::Online => "online",
      UserStatus::Offline => "offline",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
  Buy,
  Sell,
}

/// The user side of an order
#[derive(Debug, Clone)]
pub struct OrderUser {
  pub ingame_name: String,
  pub status: UserStatus,
}

/// A single market order, an immutable snapshot from the API
#[derive(Debug, Clone)]
pub struct Order {
  pub user: OrderUser,
  pub order_type: OrderType,
  pub platinum: u32,
  pub quantity: u32,
}
