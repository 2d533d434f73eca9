//! Profile infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresProfileRepository;
pub use repository::InMemoryProfileRepository;
pub use service::ProfileService;
