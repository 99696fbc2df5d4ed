//! Recipe search and dietary filtering for the recipe browser.

use serde::Deserialize;

use super::model::{DietaryRestriction, Recipe};

/// Search term plus optional dietary tag. Both must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the recipe title. Empty matches all.
    #[serde(default)]
    pub search: String,
    /// Required tag. `None` matches all.
    #[serde(default, rename = "diet")]
    pub dietary: Option<DietaryRestriction>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let matches_search = recipe
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_dietary = self.dietary.is_none_or(|tag| recipe.has_tag(tag));
        matches_search && matches_dietary
    }

    /// Filter `recipes`, preserving catalog order.
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}
