//! Grocery list aggregation.
//!
//! Merges the ingredients of the selected recipes into one list keyed on the
//! lowercased ingredient name. Units are never reconciled: the first unit
//! seen for a name is kept and later amounts are summed regardless of their
//! unit.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Ingredient, Recipe};

/// One line of the grocery list, derived from one or more ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryListEntry {
    /// Regenerated on every recompute. Never compare on it.
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl GroceryListEntry {
    fn from_ingredient(ingredient: &Ingredient) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: ingredient.name.clone(),
            amount: ingredient.amount,
            unit: ingredient.unit.clone(),
            price: ingredient.price,
        }
    }

    /// Merge key.
    pub fn folded_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Build the grocery list for `recipes`, in selection order.
///
/// Entries appear in first-occurrence order. Same-name ingredients have
/// their amounts summed into the first entry.
pub fn compute_grocery_list<'a, I>(recipes: I) -> Vec<GroceryListEntry>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut entries: Vec<GroceryListEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for recipe in recipes {
        for ingredient in &recipe.ingredients {
            let key = ingredient.name.to_lowercase();
            match index.get(&key) {
                Some(&pos) => entries[pos].amount += ingredient.amount,
                None => {
                    index.insert(key, entries.len());
                    entries.push(GroceryListEntry::from_ingredient(ingredient));
                }
            }
        }
    }

    entries
}

/// Group entries under the uppercased first character of their name.
///
/// Keys are sorted; entries keep their list order within a group. Entries
/// with an empty name are grouped under `#`.
pub fn group_by_initial(entries: &[GroceryListEntry]) -> BTreeMap<String, Vec<&GroceryListEntry>> {
    let mut groups: BTreeMap<String, Vec<&GroceryListEntry>> = BTreeMap::new();
    for entry in entries {
        let initial = entry
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_else(|| "#".to_string());
        groups.entry(initial).or_default().push(entry);
    }
    groups
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::data::builtin_recipes;

    fn recipe(id: &str, ingredients: Vec<Ingredient>) -> Recipe {
        let mut recipe = builtin_recipes().remove(0);
        recipe.id = id.to_string();
        recipe.ingredients = ingredients;
        recipe
    }

    fn comparable(entries: &[GroceryListEntry]) -> Vec<(String, f64, String)> {
        entries
            .iter()
            .map(|e| (e.name.clone(), e.amount, e.unit.clone()))
            .collect()
    }

    #[test]
    fn same_name_amounts_merge_with_first_unit() {
        let a = recipe("a", vec![Ingredient::new("1", "Olive oil", 1.0, "tbsp")]);
        let b = recipe("b", vec![Ingredient::new("1", "olive OIL", 2.0, "tsp")]);

        let list = compute_grocery_list([&a, &b]);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Olive oil");
        assert_eq!(list[0].amount, 3.0);
        assert_eq!(list[0].unit, "tbsp");
    }

    #[test]
    fn disjoint_recipes_concatenate() {
        let a = recipe(
            "a",
            vec![
                Ingredient::new("1", "Chicken breast", 200.0, "g"),
                Ingredient::new("2", "Mixed greens", 100.0, "g"),
            ],
        );
        let b = recipe(
            "b",
            vec![
                Ingredient::new("1", "Salmon fillet", 200.0, "g"),
                Ingredient::new("2", "Asparagus", 150.0, "g"),
                Ingredient::new("3", "Lemon", 1.0, "whole"),
            ],
        );

        let list = compute_grocery_list([&a, &b]);
        assert_eq!(list.len(), 5);
        let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["Chicken breast", "Mixed greens", "Salmon fillet", "Asparagus", "Lemon"]
        );
    }

    #[test]
    fn builtin_chicken_and_salmon_share_pantry_items() {
        let recipes = builtin_recipes();
        let chicken = &recipes[0];
        let salmon = &recipes[3];

        let list = compute_grocery_list([chicken, salmon]);
        assert_eq!(
            list.len(),
            chicken.ingredients.len() + salmon.ingredients.len() - 3
        );
        let oil = list.iter().find(|e| e.folded_name() == "olive oil").unwrap();
        assert_eq!(oil.amount, 3.0);
    }

    #[test]
    fn names_are_unique_after_folding() {
        let recipes = builtin_recipes();
        let list = compute_grocery_list(&recipes);
        let mut seen = HashSet::new();
        for entry in &list {
            assert!(seen.insert(entry.folded_name()), "duplicate {}", entry.name);
        }
    }

    #[test]
    fn amounts_are_conserved() {
        let recipes = builtin_recipes();
        let list = compute_grocery_list(&recipes);

        let mut expected: HashMap<String, f64> = HashMap::new();
        for ingredient in recipes.iter().flat_map(|r| &r.ingredients) {
            *expected.entry(ingredient.name.to_lowercase()).or_default() += ingredient.amount;
        }

        assert_eq!(list.len(), expected.len());
        for entry in &list {
            let want = expected[&entry.folded_name()];
            assert!((entry.amount - want).abs() < 1e-9, "{}: {} != {want}", entry.name, entry.amount);
        }
    }

    #[test]
    fn recompute_is_deterministic_except_ids() {
        let recipes = builtin_recipes();
        let first = compute_grocery_list(&recipes);
        let second = compute_grocery_list(&recipes);
        assert_eq!(comparable(&first), comparable(&second));
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn empty_selection_gives_empty_list() {
        assert!(compute_grocery_list(&Vec::<Recipe>::new()).is_empty());
    }

    #[test]
    fn grouping_by_initial() {
        let a = recipe(
            "a",
            vec![
                Ingredient::new("1", "salt", 1.0, "tsp"),
                Ingredient::new("2", "Broccoli", 1.0, "head"),
                Ingredient::new("3", "Sugar", 1.0, "tbsp"),
                Ingredient::new("4", "", 1.0, "pinch"),
            ],
        );
        let list = compute_grocery_list([&a]);
        let groups = group_by_initial(&list);

        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, ["#", "B", "S"]);
        let s: Vec<_> = groups["S"].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(s, ["salt", "Sugar"]);
    }
}
