//! Fixed category catalog.
//!
//! The board knows exactly these eight categories for the lifetime of the
//! process. Facts reference them by name; the colour is a display attribute.

use crate::error::CatalogError;

/// A fact category and its display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub color: &'static str,
}

/// All categories, in the order filter buttons are shown.
pub const CATEGORIES: [Category; 8] = [
    Category { name: "technology", color: "#3b82f6" },
    Category { name: "science", color: "#16a34a" },
    Category { name: "finance", color: "#ef4444" },
    Category { name: "society", color: "#eab308" },
    Category { name: "entertainment", color: "#db2777" },
    Category { name: "health", color: "#14b8a6" },
    Category { name: "history", color: "#f97316" },
    Category { name: "news", color: "#8b5cf6" },
];

pub fn all() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a category by name.
pub fn find(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

pub fn contains(name: &str) -> bool {
    find(name).is_some()
}

/// Display colour for a category name.
///
/// A miss means a fact references a category the catalog no longer has;
/// callers decide how to render that.
pub fn color_of(name: &str) -> Result<&'static str, CatalogError> {
    find(name)
        .map(|c| c.color)
        .ok_or_else(|| CatalogError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eight_unique_names() {
        let mut names: Vec<_> = all().iter().map(|c| c.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_color_of_known_category() {
        assert_eq!(color_of("science"), Ok("#16a34a"));
        assert_eq!(color_of("news"), Ok("#8b5cf6"));
    }

    #[test]
    fn test_color_of_missing_category_is_error() {
        assert_eq!(
            color_of("astrology"),
            Err(CatalogError::NotFound("astrology".to_string()))
        );
        // Lookup is exact, not case-folded
        assert!(color_of("Science").is_err());
        assert!(!contains(""));
    }
}
