//! Persistence layer: libSQL-backed key/value settings storage.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, load_json, save_json, to_json};

/// Fixed storage keys.
pub mod settings_keys {
    /// Finished `UserProfile` JSON blob.
    pub const USER_PROFILE: &str = "user_profile";
    /// Ordered selected recipe list.
    pub const SELECTED_RECIPES: &str = "selected_recipes";
    /// Current derived grocery list.
    pub const GROCERY_LIST: &str = "grocery_list";
    /// Default user ID (single-user system).
    pub const DEFAULT_USER: &str = "default";
}
