//! Output formatting utilities

use pizzeria_core::{Pizza, PizzaOffering, Restaurant, RestaurantPizzaDetail};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Something that renders as one table row
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl Tabular for Restaurant {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "ADDRESS"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.address.clone()]
    }
}

impl Tabular for Pizza {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "INGREDIENTS"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.ingredients.clone()]
    }
}

impl Tabular for PizzaOffering {
    fn headers() -> &'static [&'static str] {
        &["ID", "PIZZA", "PRICE"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.pizza.name.clone(), self.price.to_string()]
    }
}

impl Tabular for RestaurantPizzaDetail {
    fn headers() -> &'static [&'static str] {
        &["ID", "RESTAURANT", "PIZZA", "PRICE"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.restaurant.name.clone(),
            self.pizza.name.clone(),
            self.price.to_string(),
        ]
    }
}

/// Format a list based on format type
pub fn format_list<T: Serialize + Tabular>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Table => render_table(T::headers(), items.iter().map(Tabular::row).collect()),
    }
}

/// Format a single value as pretty JSON
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}
