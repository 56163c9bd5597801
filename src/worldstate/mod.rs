pub mod api_types;
pub mod client;
pub mod labels;
pub mod refresh;
pub mod scheduler;
pub mod timers;
pub mod types;
