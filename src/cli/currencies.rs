use super::ui;
use crate::core::RateProvider;
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

/// Rows of the currency listing: each code with its rate, if known.
pub struct CurrencyListing {
    pub base: String,
    pub rows: Vec<(String, Option<f64>)>,
    /// Set when the live list could not be fetched and the fallback is shown.
    pub fallback_reason: Option<String>,
}

impl CurrencyListing {
    pub fn display_as_table(&self, decimals: usize) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (1 {})", self.base)),
        ]);

        for (code, rate) in &self.rows {
            table.add_row(vec![
                Cell::new(code),
                ui::format_optional_cell(*rate, |r| ui::format_amount(r, decimals)),
            ]);
        }

        let mut output = format!(
            "Currencies quoted against {}\n\n",
            ui::style_text(&self.base, ui::StyleType::Title)
        );
        if let Some(reason) = &self.fallback_reason {
            output.push_str(&ui::style_text(
                &format!("Could not load the currency list ({reason}). Showing the default list."),
                ui::StyleType::Warning,
            ));
            output.push_str("\n\n");
        }
        output.push_str(&table.to_string());
        output
    }
}

/// Fetches the currencies available for `base`, falling back to `fallback`.
pub async fn list_currencies<P: RateProvider>(
    provider: &P,
    base: &str,
    fallback: &[String],
) -> CurrencyListing {
    match provider.fetch_rates(base).await {
        Ok(table) => CurrencyListing {
            base: base.to_string(),
            rows: table
                .iter()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect(),
            fallback_reason: None,
        },
        Err(e) => {
            warn!(error = %e, "Failed to fetch currency list, using fallback");
            CurrencyListing {
                base: base.to_string(),
                rows: fallback.iter().map(|code| (code.clone(), None)).collect(),
                fallback_reason: Some(ui::user_message(&e)),
            }
        }
    }
}

/// Runs the `currencies` command.
pub async fn run<P: RateProvider>(
    provider: &P,
    base: &str,
    fallback: &[String],
    decimals: usize,
) -> Result<()> {
    let pb = ui::new_spinner(format!("Fetching {base} rates..."));
    let listing = list_currencies(provider, base, fallback).await;
    pb.finish_and_clear();

    println!("{}", listing.display_as_table(decimals));
    Ok(())
}
