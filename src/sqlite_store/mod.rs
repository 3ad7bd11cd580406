mod schema;
mod store;

pub use store::{is_unique_violation, SqliteStore};
