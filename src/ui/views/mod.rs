mod market_search;
mod order_book;
mod world;

pub use market_search::MarketSearchView;
pub use order_book::OrderBookView;
pub use world::WorldView;
