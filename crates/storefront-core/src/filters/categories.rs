//! ============================================================================
//! Category Selection - Primary category plus per-category subcategories
//! ============================================================================
//! "everything" is the catch-all sentinel. Subcategory picks are remembered
//! per category id even while that category is not selected; only an explicit
//! clear drops them.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Sentinel id meaning "no category restriction"
pub const EVERYTHING: &str = "everything";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategorySelection {
    /// Never empty; `[EVERYTHING]` when nothing concrete is chosen
    pub selected: Vec<String>,
    /// Category id -> selected subcategory ids
    pub subcategories: BTreeMap<String, Vec<String>>,
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self {
            selected: vec![EVERYTHING.to_string()],
            subcategories: BTreeMap::new(),
        }
    }
}

impl CategorySelection {
    pub fn is_everything(&self) -> bool {
        self.selected.iter().any(|c| c == EVERYTHING)
    }

    /// Toggle a primary category.
    ///
    /// - `everything` collapses the selection to `[everything]`
    /// - a concrete id while `everything` is selected replaces it
    /// - a selected concrete id is removed, falling back to `[everything]`
    /// - a new concrete id next to other concrete ids is appended
    pub fn toggle_category(&mut self, id: &str) {
        debug!("Toggling category {}", id);

        if id == EVERYTHING {
            self.selected = vec![EVERYTHING.to_string()];
            return;
        }

        if self.is_everything() {
            self.selected = vec![id.to_string()];
            return;
        }

        if let Some(pos) = self.selected.iter().position(|c| c == id) {
            self.selected.remove(pos);
            if self.selected.is_empty() {
                self.selected.push(EVERYTHING.to_string());
            }
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Single-select convenience used by the category bar
    pub fn select_only(&mut self, id: &str) {
        self.selected = vec![id.to_string()];
    }

    pub fn toggle_subcategory(&mut self, category_id: &str, subcategory_id: &str) {
        let subs = self
            .subcategories
            .entry(category_id.to_string())
            .or_default();

        match subs.iter().position(|s| s == subcategory_id) {
            Some(pos) => {
                subs.remove(pos);
            }
            None => subs.push(subcategory_id.to_string()),
        }

        if subs.is_empty() {
            self.subcategories.remove(category_id);
        }
    }

    /// Drop the subcategory picks of the currently selected categories only
    pub fn clear_subcategories_for_selected(&mut self) {
        for category in &self.selected {
            self.subcategories.remove(category);
        }
    }

    pub fn subcategories_for(&self, category_id: &str) -> &[String] {
        self.subcategories
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether an item in `category_id` / `subcategory_id` passes the selection
    pub fn matches(&self, category_id: &str, subcategory_id: Option<&str>) -> bool {
        if self.is_everything() {
            return true;
        }
        if !self.selected.iter().any(|c| c == category_id) {
            return false;
        }
        let subs = self.subcategories_for(category_id);
        if subs.is_empty() {
            return true;
        }
        subcategory_id.map_or(false, |s| subs.iter().any(|x| x == s))
    }

    /// Count of active category facets: the primary pick plus each category with subcategories
    pub fn active_count(&self) -> usize {
        let primary = usize::from(!self.is_everything());
        let subs = self
            .selected
            .iter()
            .filter(|c| !self.subcategories_for(c).is_empty())
            .count();
        primary + subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_everything() {
        let sel = CategorySelection::default();
        assert_eq!(sel.selected, vec![EVERYTHING]);
        assert!(sel.is_everything());
        assert_eq!(sel.active_count(), 0);
    }

    #[test]
    fn test_concrete_replaces_everything() {
        let mut sel = CategorySelection::default();
        sel.toggle_category("toys");
        assert_eq!(sel.selected, vec!["toys"]);
    }

    #[test]
    fn test_everything_collapses_selection() {
        let mut sel = CategorySelection::default();
        sel.toggle_category("toys");
        sel.toggle_category("books");
        assert_eq!(sel.selected, vec!["toys", "books"]);
        sel.toggle_category(EVERYTHING);
        assert_eq!(sel.selected, vec![EVERYTHING]);
    }

    #[test]
    fn test_deselect_last_falls_back_to_everything() {
        let mut sel = CategorySelection::default();
        sel.toggle_category("toys");
        sel.toggle_category("toys");
        assert_eq!(sel.selected, vec![EVERYTHING]);
    }

    #[test]
    fn test_everything_keeps_subcategory_picks() {
        let mut sel = CategorySelection::default();
        sel.toggle_category("toys");
        sel.toggle_subcategory("toys", "puzzles");
        sel.toggle_subcategory("toys", "trains");

        sel.toggle_category(EVERYTHING);
        assert_eq!(sel.subcategories_for("toys"), ["puzzles", "trains"]);

        sel.toggle_category("toys");
        sel.clear_subcategories_for_selected();
        assert!(sel.subcategories_for("toys").is_empty());
    }

    #[test]
    fn test_clear_only_touches_selected_category() {
        let mut sel = CategorySelection::default();
        sel.toggle_subcategory("toys", "puzzles");
        sel.toggle_subcategory("books", "picture");
        sel.select_only("books");
        sel.clear_subcategories_for_selected();
        assert_eq!(sel.subcategories_for("toys"), ["puzzles"]);
        assert!(sel.subcategories_for("books").is_empty());
    }

    #[test]
    fn test_subcategory_toggle_twice_removes_entry() {
        let mut sel = CategorySelection::default();
        sel.toggle_subcategory("toys", "puzzles");
        sel.toggle_subcategory("toys", "puzzles");
        assert!(sel.subcategories.is_empty());
    }

    #[test]
    fn test_matches() {
        let mut sel = CategorySelection::default();
        assert!(sel.matches("books", None));

        sel.toggle_category("toys");
        assert!(sel.matches("toys", None));
        assert!(!sel.matches("books", None));

        sel.toggle_subcategory("toys", "trains");
        assert!(sel.matches("toys", Some("trains")));
        assert!(!sel.matches("toys", Some("dolls")));
        assert!(!sel.matches("toys", None));
        assert_eq!(sel.active_count(), 2);
    }
}
