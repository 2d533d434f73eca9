//! API layer - HTTP endpoints

pub mod accounts;
pub mod health;
pub mod profiles;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router_with_state;
pub use state::AppState;
