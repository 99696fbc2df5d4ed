//! Error types for the meal planner.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Grocery list error: {0}")]
    Grocery(#[from] GroceryError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Storage collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Recipe and store catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Recipe {id} not found")]
    RecipeNotFound { id: String },

    #[error("Grocery store {id} not found")]
    StoreNotFound { id: String },
}

/// Malformed user input, rejected before it reaches wizard state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a whole number, got {raw:?}")]
    NotANumber { field: String, raw: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep { field: String, value: i64, step: i64 },

    #[error("{update} cannot be changed on the {step} step")]
    WrongStep { update: String, step: String },

    #[error("Allergen must not be empty")]
    EmptyAllergen,
}

/// Order placement errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("No grocery store selected")]
    NoStoreSelected,

    #[error("Grocery list is empty")]
    EmptyGroceryList,

    #[error("An order is already being placed")]
    AlreadyInProgress,

    #[error("Delivery from {store} failed: {reason}")]
    DeliveryFailed { store: String, reason: String },
}

/// Grocery list view errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroceryError {
    #[error("Grocery item {id} is not on the current list")]
    ItemNotFound { id: String },
}

/// Result type alias for the meal planner.
pub type Result<T> = std::result::Result<T, Error>;
