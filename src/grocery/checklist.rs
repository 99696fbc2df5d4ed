//! Per-view check marks on grocery list entries. Not persisted.

use std::collections::HashMap;

use uuid::Uuid;

use super::aggregate::GroceryListEntry;

/// Entry id → checked. Missing ids count as unchecked.
#[derive(Debug, Clone, Default)]
pub struct Checklist {
    checked: HashMap<Uuid, bool>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one entry. Returns the new state.
    pub fn toggle_item(&mut self, id: Uuid) -> bool {
        let slot = self.checked.entry(id).or_insert(false);
        *slot = !*slot;
        *slot
    }

    /// Set every entry in `entries` to `checked`.
    pub fn toggle_all(&mut self, entries: &[GroceryListEntry], checked: bool) {
        self.checked = entries.iter().map(|e| (e.id, checked)).collect();
    }

    pub fn is_checked(&self, id: &Uuid) -> bool {
        self.checked.get(id).copied().unwrap_or(false)
    }

    pub fn checked_count(&self, entries: &[GroceryListEntry]) -> usize {
        entries.iter().filter(|e| self.is_checked(&e.id)).count()
    }

    /// True only for a non-empty list with every entry checked.
    pub fn all_checked(&self, entries: &[GroceryListEntry]) -> bool {
        !entries.is_empty() && self.checked_count(entries) == entries.len()
    }

    /// Some but not all entries checked (the "indeterminate" select-all box).
    pub fn some_checked(&self, entries: &[GroceryListEntry]) -> bool {
        let n = self.checked_count(entries);
        n > 0 && n < entries.len()
    }

    /// Forget marks for ids not in `entries`.
    pub fn retain(&mut self, entries: &[GroceryListEntry]) {
        self.checked
            .retain(|id, _| entries.iter().any(|e| e.id == *id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::data::builtin_recipes;
    use crate::grocery::aggregate::compute_grocery_list;

    #[test]
    fn toggling_items() {
        let entries = compute_grocery_list(&builtin_recipes()[..1]);
        let mut checklist = Checklist::new();
        assert!(!checklist.is_checked(&entries[0].id));

        assert!(checklist.toggle_item(entries[0].id));
        assert!(checklist.is_checked(&entries[0].id));
        assert!(checklist.some_checked(&entries));
        assert!(!checklist.all_checked(&entries));

        assert!(!checklist.toggle_item(entries[0].id));
        assert_eq!(checklist.checked_count(&entries), 0);
    }

    #[test]
    fn toggle_all_both_ways() {
        let entries = compute_grocery_list(&builtin_recipes()[..2]);
        let mut checklist = Checklist::new();

        checklist.toggle_all(&entries, true);
        assert!(checklist.all_checked(&entries));
        assert!(!checklist.some_checked(&entries));

        checklist.toggle_all(&entries, false);
        assert_eq!(checklist.checked_count(&entries), 0);
    }

    #[test]
    fn empty_list_is_never_all_checked() {
        let checklist = Checklist::new();
        assert!(!checklist.all_checked(&[]));
        assert!(!checklist.some_checked(&[]));
    }

    #[test]
    fn retain_drops_stale_ids() {
        let recipes = builtin_recipes();
        let old = compute_grocery_list(&recipes[..1]);
        let mut checklist = Checklist::new();
        checklist.toggle_all(&old, true);

        let new = compute_grocery_list(&recipes[..1]);
        checklist.retain(&new);
        assert_eq!(checklist.checked_count(&old), 0);
    }
}
