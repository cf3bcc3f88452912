//! The fixed category table.

/// A named category with its label colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub color: &'static str,
}

pub static DEFAULT_CATEGORIES: [Category; 7] = [
    Category { name: "Work", color: "#8B9DC3" },
    Category { name: "Personal", color: "#D4A574" },
    Category { name: "Health", color: "#9CAF88" },
    Category { name: "Learning", color: "#C8A2C8" },
    Category { name: "Errands", color: "#B8B8B8" },
    Category { name: "Home", color: "#C4A484" },
    Category { name: "Finance", color: "#A8C4A2" },
];

const UNCATEGORIZED_COLOR: &str = "#E8E8E8";
const UNKNOWN_CATEGORY_COLOR: &str = "#A8A8A8";

pub fn find_category(name: &str) -> Option<&'static Category> {
    DEFAULT_CATEGORIES.iter().find(|category| category.name == name)
}

/// Label colour for a task's category. Names match exactly.
pub fn category_color(name: Option<&str>) -> &'static str {
    match name {
        None => UNCATEGORIZED_COLOR,
        Some(name) => find_category(name).map_or(UNKNOWN_CATEGORY_COLOR, |c| c.color),
    }
}
