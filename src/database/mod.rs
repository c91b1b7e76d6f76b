pub mod audits;
pub mod connection;
pub mod events;
pub mod matches;
pub mod models;
pub mod results;
pub mod setup;
pub mod standings;
pub mod store;
pub mod teams;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::NewMatch;
pub use store::SqliteStore;
