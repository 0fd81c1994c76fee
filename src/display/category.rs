//! Category display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Min")]
    min: i64,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            min: category.min_limit,
            max: if category.has_max_limit() {
                category.max_limit.to_string()
            } else {
                "none".to_string()
            },
            description: category.description.clone(),
        }
    }
}

/// Table of categories with their limits
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'spendwise category add' to create one.".to_string();
    }

    let mut table = Table::new(categories.iter().map(CategoryRow::from));
    table.with(Style::psql());
    table.to_string()
}

pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();
    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:          {}\n", category.id));
    if !category.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", category.description));
    }
    output.push_str(&format!("  Min limit:   {}\n", category.min_limit));
    if category.has_max_limit() {
        output.push_str(&format!("  Max limit:   {}\n", category.max_limit));
    } else {
        output.push_str("  Max limit:   none (excluded from limit charts)\n");
    }
    output.push_str(&format!(
        "  Created:     {}\n",
        category.created_at.format("%Y-%m-%d %H:%M")
    ));
    output
}
