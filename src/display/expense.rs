//! Expense display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::{Expense, Money};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Table of expenses followed by their total
pub fn format_expense_list(expenses: &[Expense], currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        id: e.id.to_string(),
        date: e.date.clone(),
        name: e.name.clone(),
        category: e.category.clone(),
        amount: e.amount.format_with_symbol(currency),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    format!(
        "{}\n\n{} expenses, total {}",
        table,
        expenses.len(),
        total.format_with_symbol(currency)
    )
}

pub fn format_expense_details(expense: &Expense, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Expense: {}\n", expense.name));
    output.push_str(&format!("  ID:       {}\n", expense.id));
    output.push_str(&format!("  Date:     {}\n", expense.date));
    output.push_str(&format!("  Category: {}\n", expense.category));
    output.push_str(&format!(
        "  Amount:   {}\n",
        expense.amount.format_with_symbol(currency)
    ));
    if !expense.description.is_empty() {
        output.push_str(&format!("  Note:     {}\n", expense.description));
    }
    if let Some(image) = &expense.image {
        output.push_str(&format!("  Receipt:  {}\n", image));
    }
    if expense.updated_at != expense.created_at {
        output.push_str(&format!(
            "  Edited:   {}\n",
            expense.updated_at.format("%Y-%m-%d %H:%M")
        ));
    }
    output
}
