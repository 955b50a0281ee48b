use crate::types::{eq_ignore_case, Category};

const CATEGORIES: [Category; 4] = [
    Category {
        id: "tech",
        name: "Technical Support",
    },
    Category {
        id: "billing",
        name: "Billing Inquiry",
    },
    Category {
        id: "general",
        name: "General Feedback",
    },
    Category {
        id: "feature",
        name: "Feature Request",
    },
];

/// Fixed, read-only set of categories complaints may be filed under.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryCatalog;

impl CategoryCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Returns every category in catalog order.
    pub fn list(&self) -> &'static [Category] {
        &CATEGORIES
    }

    /// Looks up a category by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&'static Category> {
        CATEGORIES
            .iter()
            .find(|category| eq_ignore_case(category.name, name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_fixed_categories_in_order() {
        let ids: Vec<_> = CategoryCatalog::new().list().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["tech", "billing", "general", "feature"]);
    }

    #[test]
    fn exists_ignores_case() {
        let catalog = CategoryCatalog::new();
        assert!(catalog.exists("Technical Support"));
        assert!(catalog.exists("billing inquiry"));
        assert!(catalog.exists("FEATURE REQUEST"));
    }

    #[test]
    fn exists_folds_non_ascii_case_variants() {
        let catalog = CategoryCatalog::new();
        assert!(catalog.exists("TECHNICAL ſUPPORT"));
        assert!(catalog.exists("billing inquiry"));
        assert!(!catalog.exists("Technical Supporte"));
    }

    #[test]
    fn rejects_ids_and_partial_names() {
        let catalog = CategoryCatalog::new();
        assert!(!catalog.exists("tech"));
        assert!(!catalog.exists("Technical"));
        assert!(!catalog.exists(""));
        assert!(!catalog.exists("Not A Real Category"));
    }

    #[test]
    fn find_returns_canonical_entry() {
        let category = CategoryCatalog::new().find("general feedback").unwrap();
        assert_eq!(category.id, "general");
        assert_eq!(category.name, "General Feedback");
    }
}
