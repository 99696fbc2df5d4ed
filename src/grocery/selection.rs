//! Selected recipes and the grocery list derived from them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::catalog::Recipe;
use crate::error::DatabaseError;
use crate::store::{Database, load_json, settings_keys, to_json};

use super::aggregate::{GroceryListEntry, compute_grocery_list};

/// Recipes picked on the recipe page, in selection order, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedRecipeSet(Vec<Recipe>);

impl SelectedRecipeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the recipe if selected, otherwise append it. Returns whether it
    /// is selected afterwards.
    pub fn toggle(&mut self, recipe: Recipe) -> bool {
        if self.remove(&recipe.id) {
            false
        } else {
            self.0.push(recipe);
            true
        }
    }

    pub fn remove(&mut self, recipe_id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|r| r.id != recipe_id);
        self.0.len() != before
    }

    pub fn contains(&self, recipe_id: &str) -> bool {
        self.0.iter().any(|r| r.id == recipe_id)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.0
    }

    pub fn ids(&self) -> Vec<String> {
        self.0.iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fresh grocery list for the current selection.
    pub fn grocery_list(&self) -> Vec<GroceryListEntry> {
        compute_grocery_list(&self.0)
    }
}

#[derive(Debug, Default)]
struct Selection {
    recipes: SelectedRecipeSet,
    grocery_list: Vec<GroceryListEntry>,
}

/// Owns the selection and its grocery list, and keeps storage in step.
///
/// Every mutation recomputes the list from scratch and writes both keys in
/// one transaction before the in-memory copy changes.
pub struct SelectionManager {
    db: Arc<dyn Database>,
    state: RwLock<Selection>,
}

impl SelectionManager {
    /// Empty selection; call `load` to restore a saved one.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            state: RwLock::new(Selection::default()),
        }
    }

    /// Restore selection and grocery list from storage.
    ///
    /// A stored list that does not match the stored selection is replaced by
    /// a recomputed one.
    pub async fn load(&self) -> Result<(), DatabaseError> {
        let recipes: SelectedRecipeSet = load_json(
            self.db.as_ref(),
            settings_keys::DEFAULT_USER,
            settings_keys::SELECTED_RECIPES,
        )
        .await?
        .unwrap_or_default();
        let stored: Option<Vec<GroceryListEntry>> = load_json(
            self.db.as_ref(),
            settings_keys::DEFAULT_USER,
            settings_keys::GROCERY_LIST,
        )
        .await?;

        let fresh = recipes.grocery_list();
        let grocery_list = match stored {
            Some(list) if same_lines(&list, &fresh) => list,
            Some(_) => {
                warn!("Stored grocery list is out of date, recomputing");
                fresh
            }
            None => fresh,
        };

        info!(
            selected = recipes.len(),
            items = grocery_list.len(),
            "Selection loaded"
        );
        *self.state.write().await = Selection {
            recipes,
            grocery_list,
        };
        Ok(())
    }

    /// Select or deselect `recipe`. Returns whether it is selected afterwards.
    pub async fn toggle_recipe(&self, recipe: Recipe) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let mut recipes = state.recipes.clone();
        let recipe_id = recipe.id.clone();
        let selected = recipes.toggle(recipe);

        self.commit(&mut state, recipes).await?;
        info!(recipe_id = %recipe_id, selected, count = state.recipes.len(), "Recipe toggled");
        Ok(selected)
    }

    /// Deselect by id. Returns whether it was selected.
    pub async fn remove_recipe(&self, recipe_id: &str) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let mut recipes = state.recipes.clone();
        if !recipes.remove(recipe_id) {
            return Ok(false);
        }

        self.commit(&mut state, recipes).await?;
        info!(recipe_id, count = state.recipes.len(), "Recipe removed");
        Ok(true)
    }

    pub async fn selected(&self) -> SelectedRecipeSet {
        self.state.read().await.recipes.clone()
    }

    pub async fn grocery_list(&self) -> Vec<GroceryListEntry> {
        self.state.read().await.grocery_list.clone()
    }

    /// The meal plan needs at least one recipe.
    pub async fn can_continue(&self) -> bool {
        !self.state.read().await.recipes.is_empty()
    }

    async fn commit(
        &self,
        state: &mut Selection,
        recipes: SelectedRecipeSet,
    ) -> Result<(), DatabaseError> {
        let grocery_list = recipes.grocery_list();
        self.db
            .set_settings(
                settings_keys::DEFAULT_USER,
                &[
                    (
                        settings_keys::SELECTED_RECIPES,
                        to_json(settings_keys::SELECTED_RECIPES, &recipes)?,
                    ),
                    (
                        settings_keys::GROCERY_LIST,
                        to_json(settings_keys::GROCERY_LIST, &grocery_list)?,
                    ),
                ],
            )
            .await?;

        state.recipes = recipes;
        state.grocery_list = grocery_list;
        Ok(())
    }
}

fn same_lines(a: &[GroceryListEntry], b: &[GroceryListEntry]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.name == y.name && x.amount == y.amount && x.unit == y.unit)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::catalog::data::builtin_recipes;
    use crate::store::{LibSqlBackend, save_json};

    async fn memory_db() -> Arc<dyn Database> {
        Arc::new(LibSqlBackend::new_memory().await.unwrap())
    }

    /// Real storage that refuses every write touching the grocery list.
    struct RejectGroceryList(LibSqlBackend);

    #[async_trait]
    impl Database for RejectGroceryList {
        async fn init_schema(&self) -> Result<(), DatabaseError> {
            self.0.init_schema().await
        }

        async fn get_setting(
            &self,
            user_id: &str,
            key: &str,
        ) -> Result<Option<serde_json::Value>, DatabaseError> {
            self.0.get_setting(user_id, key).await
        }

        async fn set_setting(
            &self,
            user_id: &str,
            key: &str,
            value: &serde_json::Value,
        ) -> Result<(), DatabaseError> {
            if key == settings_keys::GROCERY_LIST {
                return Err(DatabaseError::Query("grocery_list: disk full".to_string()));
            }
            self.0.set_setting(user_id, key, value).await
        }

        async fn set_settings(
            &self,
            user_id: &str,
            entries: &[(&str, serde_json::Value)],
        ) -> Result<(), DatabaseError> {
            if entries.iter().any(|(k, _)| *k == settings_keys::GROCERY_LIST) {
                return Err(DatabaseError::Query("grocery_list: disk full".to_string()));
            }
            self.0.set_settings(user_id, entries).await
        }

        async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError> {
            self.0.delete_setting(user_id, key).await
        }
    }

    fn lines(entries: &[GroceryListEntry]) -> Vec<(String, f64, String)> {
        entries
            .iter()
            .map(|e| (e.name.clone(), e.amount, e.unit.clone()))
            .collect()
    }

    #[test]
    fn set_toggle_is_self_inverse() {
        let recipes = builtin_recipes();
        let mut set = SelectedRecipeSet::new();
        set.toggle(recipes[0].clone());
        let before = set.clone();

        assert!(set.toggle(recipes[2].clone()));
        assert!(!set.toggle(recipes[2].clone()));
        assert_eq!(set, before);
    }

    #[test]
    fn set_keeps_selection_order() {
        let recipes = builtin_recipes();
        let mut set = SelectedRecipeSet::new();
        set.toggle(recipes[3].clone());
        set.toggle(recipes[1].clone());
        assert_eq!(set.ids(), ["4", "2"]);
        assert!(set.contains("4"));
        assert!(!set.contains("1"));
    }

    #[tokio::test]
    async fn toggle_twice_restores_grocery_list() {
        let recipes = builtin_recipes();
        let manager = SelectionManager::new(memory_db().await);
        manager.toggle_recipe(recipes[0].clone()).await.unwrap();
        let before = manager.grocery_list().await;

        assert!(manager.toggle_recipe(recipes[3].clone()).await.unwrap());
        assert!(!manager.toggle_recipe(recipes[3].clone()).await.unwrap());

        assert_eq!(lines(&manager.grocery_list().await), lines(&before));
        assert_eq!(manager.selected().await.ids(), ["1"]);
    }

    #[tokio::test]
    async fn selection_survives_reload() {
        let db = memory_db().await;
        let recipes = builtin_recipes();

        let first = SelectionManager::new(db.clone());
        first.toggle_recipe(recipes[1].clone()).await.unwrap();
        first.toggle_recipe(recipes[2].clone()).await.unwrap();
        let list = first.grocery_list().await;

        let second = SelectionManager::new(db);
        assert!(!second.can_continue().await);
        second.load().await.unwrap();
        assert!(second.can_continue().await);
        assert_eq!(second.selected().await.ids(), ["2", "3"]);
        // Same stored ids, not a recompute.
        assert_eq!(second.grocery_list().await, list);
    }

    #[tokio::test]
    async fn stale_stored_list_is_recomputed() {
        let db = memory_db().await;
        let recipes = builtin_recipes();
        let mut set = SelectedRecipeSet::new();
        set.toggle(recipes[0].clone());
        save_json(
            db.as_ref(),
            settings_keys::DEFAULT_USER,
            settings_keys::SELECTED_RECIPES,
            &set,
        )
        .await
        .unwrap();
        save_json(
            db.as_ref(),
            settings_keys::DEFAULT_USER,
            settings_keys::GROCERY_LIST,
            &Vec::<GroceryListEntry>::new(),
        )
        .await
        .unwrap();

        let manager = SelectionManager::new(db);
        manager.load().await.unwrap();
        assert_eq!(manager.grocery_list().await.len(), recipes[0].ingredients.len());
    }

    #[tokio::test]
    async fn remove_recipe() {
        let recipes = builtin_recipes();
        let manager = SelectionManager::new(memory_db().await);
        manager.toggle_recipe(recipes[0].clone()).await.unwrap();

        assert!(!manager.remove_recipe("9").await.unwrap());
        assert!(manager.remove_recipe("1").await.unwrap());
        assert!(manager.grocery_list().await.is_empty());
        assert!(!manager.can_continue().await);
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_and_storage_in_step() {
        let db: Arc<dyn Database> =
            Arc::new(RejectGroceryList(LibSqlBackend::new_memory().await.unwrap()));
        let recipes = builtin_recipes();
        let manager = SelectionManager::new(db.clone());

        let err = manager.toggle_recipe(recipes[0].clone()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(manager.selected().await.is_empty());
        assert!(manager.grocery_list().await.is_empty());

        let reloaded = SelectionManager::new(db);
        reloaded.load().await.unwrap();
        assert!(reloaded.selected().await.is_empty());
        assert!(reloaded.grocery_list().await.is_empty());
    }
}
