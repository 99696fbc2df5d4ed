//! Read-only recipe and grocery store catalog.

pub mod data;
pub mod filter;
pub mod model;

use async_trait::async_trait;

use crate::error::CatalogError;

pub use filter::RecipeFilter;
pub use model::{DietaryRestriction, GroceryStore, Ingredient, Recipe};

/// Catalog collaborator. Returns the full lists; no pagination.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn recipes(&self) -> Result<Vec<Recipe>, CatalogError>;

    async fn stores(&self) -> Result<Vec<GroceryStore>, CatalogError>;

    /// Look up a single recipe by id.
    async fn recipe(&self, id: &str) -> Result<Recipe, CatalogError> {
        self.recipes()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CatalogError::RecipeNotFound { id: id.to_string() })
    }

    /// Look up a single store by id.
    async fn store(&self, id: &str) -> Result<GroceryStore, CatalogError> {
        self.stores()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::StoreNotFound { id: id.to_string() })
    }
}

/// In-memory catalog over fixed lists.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    recipes: Vec<Recipe>,
    stores: Vec<GroceryStore>,
}

impl StaticCatalog {
    pub fn new(recipes: Vec<Recipe>, stores: Vec<GroceryStore>) -> Self {
        Self { recipes, stores }
    }

    /// The built-in four recipes and three stores.
    pub fn builtin() -> Self {
        Self::new(data::builtin_recipes(), data::builtin_stores())
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn recipes(&self) -> Result<Vec<Recipe>, CatalogError> {
        Ok(self.recipes.clone())
    }

    async fn stores(&self) -> Result<Vec<GroceryStore>, CatalogError> {
        Ok(self.stores.clone())
    }
}
