use crate::core::{ConversionError, ConversionRequest};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a spinner shown while waiting on the rate service.
pub fn new_spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Fixed-point display of a converted amount.
pub fn format_amount(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// One line describing a successful conversion, e.g. `100 USD = 92.000000 EUR`.
pub fn format_conversion(request: &ConversionRequest, result: f64, decimals: usize) -> String {
    let converted = format!("{} {}", format_amount(result, decimals), request.to);
    format!(
        "{} {} = {}",
        request.amount,
        request.from,
        style_text(&converted, StyleType::Result)
    )
}

/// Turns a conversion failure into a message for the user.
pub fn user_message(error: &ConversionError) -> String {
    match error {
        ConversionError::InvalidAmount(_) => "Enter a valid number".to_string(),
        ConversionError::UnknownCurrency(code) => format!("Unknown currency: {code}"),
        ConversionError::MalformedRate(code) => {
            format!("The rate service sent an invalid rate for {code}")
        }
        ConversionError::Api { status, .. } => {
            format!("The rate service returned an error (HTTP {status})")
        }
        ConversionError::Network(_) => "Could not reach the rate service".to_string(),
        ConversionError::MalformedResponse(_) => {
            "The rate service sent an unexpected response".to_string()
        }
    }
}
