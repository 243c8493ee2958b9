use super::{convert, ui};
use crate::core::{Converter, RateProvider};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const USAGE: &str = "Enter AMOUNT FROM TO (e.g. `100 USD EUR`), or `quit` to exit";

/// Splits `100 usd to eur` / `100 usd eur` into its three parts.
fn parse_line(line: &str) -> Option<(&str, &str, &str)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [amount, from, to] => Some((*amount, *from, *to)),
        [amount, from, sep, to] if sep.eq_ignore_ascii_case("to") => Some((*amount, *from, *to)),
        _ => None,
    }
}

/// Reads conversion requests line by line until EOF or `quit`.
///
/// A failed conversion is reported and the session carries on.
pub async fn run_session<P, R, W>(
    converter: &Converter<P>,
    mut input: R,
    out: &mut W,
    decimals: usize,
) -> Result<()>
where
    P: RateProvider,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", ui::style_text(USAGE, ui::StyleType::Subtle))?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        let Some((amount, from, to)) = parse_line(trimmed) else {
            writeln!(out, "{}", ui::style_text(USAGE, ui::StyleType::Error))?;
            continue;
        };

        match convert::convert_line(converter, amount, from, to, decimals).await {
            Ok(result) => writeln!(out, "{result}")?,
            Err(e) => {
                debug!(error = %e, "Conversion failed");
                writeln!(
                    out,
                    "{}",
                    ui::style_text(&ui::user_message(&e), ui::StyleType::Error)
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionError, RateTable};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedRates;

    #[async_trait]
    impl RateProvider for FixedRates {
        async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, ConversionError> {
            match base_currency {
                "USD" => RateTable::from_response(
                    base_currency,
                    json!({"data": {"EUR": 0.92, "GBP": 0.79}}),
                ),
                _ => Err(ConversionError::Api {
                    status: 422,
                    body: "unsupported base".to_string(),
                }),
            }
        }
    }

    async fn run_script(script: &str) -> String {
        let converter = Converter::new(FixedRates);
        let mut out = Vec::new();
        run_session(&converter, script.as_bytes(), &mut out, 2)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("100 USD EUR"), Some(("100", "USD", "EUR")));
        assert_eq!(parse_line("100 usd TO eur"), Some(("100", "usd", "eur")));
        assert_eq!(parse_line("100 USD"), None);
        assert_eq!(parse_line("100 USD into EUR"), None);
    }

    #[tokio::test]
    async fn test_session_continues_after_failures() {
        let output = run_script("abc USD EUR\n100 USD XYZ\n10 CHF EUR\n100 usd eur\n").await;

        assert!(output.contains("Enter a valid number"));
        assert!(output.contains("Unknown currency: XYZ"));
        assert!(output.contains("The rate service returned an error (HTTP 422)"));
        assert!(output.contains("92.00 EUR"));
    }

    #[tokio::test]
    async fn test_session_stops_at_quit() {
        let output = run_script("\n1 USD GBP\nquit\n100 USD EUR\n").await;

        assert!(output.contains("0.79 GBP"));
        assert!(!output.contains("92.00 EUR"));
    }

    #[tokio::test]
    async fn test_session_reports_usage_for_bad_lines() {
        let output = run_script("convert please\n").await;
        assert!(output.matches("Enter AMOUNT FROM TO").count() >= 2);
    }
}
