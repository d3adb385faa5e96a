//! Category display formatting
//!
//! Formats categories as a tree grouped by kind.

use crate::models::{Category, CategoryKind};

/// Format categories as a tree under "Income" and "Expense" headings
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'parcela init' to create default categories.\n"
            .to_string();
    }

    let mut output = String::new();
    let mut first = true;

    for (kind, title) in [
        (CategoryKind::Income, "Income"),
        (CategoryKind::Expense, "Expense"),
    ] {
        let group: Vec<_> = categories.iter().filter(|c| c.kind == kind).collect();
        if group.is_empty() {
            continue;
        }

        if !first {
            output.push('\n');
        }
        first = false;

        output.push_str(&format!("{}\n", title));
        for (j, category) in group.iter().enumerate() {
            let prefix = if j == group.len() - 1 { "└── " } else { "├── " };
            let marker = if category.is_default { " (default)" } else { "" };
            output.push_str(&format!("  {}{}{}\n", prefix, category.name, marker));
        }
    }

    output
}

/// Format a single category's details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:      {}\n", category.id.full()));
    output.push_str(&format!("  Kind:    {}\n", category.kind));
    output.push_str(&format!(
        "  Default: {}\n",
        if category.is_default { "Yes" } else { "No" }
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnerId;

    #[test]
    fn test_format_category_tree() {
        let owner = OwnerId::new();
        let categories = vec![
            Category::default_for(owner, "Salário", CategoryKind::Income),
            Category::new(owner, "Freelance", CategoryKind::Income),
            Category::new(owner, "Mercado", CategoryKind::Expense),
        ];

        let output = format_category_tree(&categories);
        assert!(output.starts_with("Income\n"));
        assert!(output.contains("├── Salário (default)"));
        assert!(output.contains("└── Freelance"));
        assert!(output.contains("Expense\n  └── Mercado"));
    }

    #[test]
    fn test_format_empty_tree() {
        assert!(format_category_tree(&[]).contains("parcela init"));
    }

    #[test]
    fn test_format_category_details() {
        let category = Category::new(OwnerId::new(), "Mercado", CategoryKind::Expense);
        let output = format_category_details(&category);
        assert!(output.contains("Kind:    Expense"));
        assert!(output.contains("Default: No"));
    }
}
