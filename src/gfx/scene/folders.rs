//! Named folders used to group objects in the hierarchy and for export.

use std::collections::HashMap;

use super::object::DEFAULT_FOLDER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderState {
    pub open: bool,
    pub order: u32,
}

/// Folder set. `"Scene"` always exists with order 0.
#[derive(Debug, Clone)]
pub struct FolderSet {
    folders: HashMap<String, FolderState>,
}

impl Default for FolderSet {
    fn default() -> Self {
        let mut folders = HashMap::new();
        folders.insert(
            DEFAULT_FOLDER.to_string(),
            FolderState {
                open: true,
                order: 0,
            },
        );
        Self { folders }
    }
}

impl FolderSet {
    pub fn contains(&self, name: &str) -> bool {
        self.folders.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<FolderState> {
        self.folders.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Creates the folder (open, ordered last) if it does not exist.
    /// Returns true when a new folder was created.
    pub fn ensure(&mut self, name: &str) -> bool {
        if self.folders.contains_key(name) {
            return false;
        }
        let order = self.folders.values().map(|f| f.order).max().map_or(0, |o| o + 1);
        self.folders
            .insert(name.to_string(), FolderState { open: true, order });
        true
    }

    pub fn toggle(&mut self, name: &str) {
        if let Some(folder) = self.folders.get_mut(name) {
            folder.open = !folder.open;
        }
    }

    /// Removes a folder. The default folder is never removed.
    pub fn remove(&mut self, name: &str) -> bool {
        if name == DEFAULT_FOLDER {
            return false;
        }
        self.folders.remove(name).is_some()
    }

    /// Folder names sorted by creation order.
    pub fn sorted(&self) -> Vec<(&str, FolderState)> {
        let mut folders: Vec<_> = self
            .folders
            .iter()
            .map(|(name, state)| (name.as_str(), *state))
            .collect();
        folders.sort_by_key(|(_, state)| state.order);
        folders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_folder_always_exists() {
        let mut folders = FolderSet::default();
        assert!(folders.contains(DEFAULT_FOLDER));
        assert!(!folders.remove(DEFAULT_FOLDER));
        assert!(folders.contains(DEFAULT_FOLDER));
    }

    #[test]
    fn test_ensure_orders_by_creation() {
        let mut folders = FolderSet::default();
        assert!(folders.ensure("Lights"));
        assert!(folders.ensure("Props"));
        assert!(!folders.ensure("Lights"));

        let names: Vec<&str> = folders.sorted().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Scene", "Lights", "Props"]);
    }

    #[test]
    fn test_order_is_not_reused_after_remove() {
        let mut folders = FolderSet::default();
        folders.ensure("A");
        folders.ensure("B");
        folders.remove("A");
        folders.ensure("C");

        assert!(folders.get("C").map(|f| f.order) > folders.get("B").map(|f| f.order));
    }
}
