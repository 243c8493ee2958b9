use super::ui;
use crate::core::{ConversionError, ConversionRequest, Converter, RateProvider};
use anyhow::Result;
use tracing::{debug, info};

/// Parses the request, converts it and renders the outcome as a single line.
///
/// `Err` carries the failure so callers decide whether it ends the program.
pub async fn convert_line<P: RateProvider>(
    converter: &Converter<P>,
    amount: &str,
    from: &str,
    to: &str,
    decimals: usize,
) -> Result<String, ConversionError> {
    let request = ConversionRequest::parse(amount, from, to)?;
    info!(
        amount = request.amount,
        from = %request.from,
        to = %request.to,
        "Starting conversion"
    );

    let pb = ui::new_spinner(format!("Fetching {} rates...", request.from));
    let result = converter.convert_request(&request).await;
    pb.finish_and_clear();

    let value = result?;
    debug!(value, "Conversion succeeded");
    Ok(ui::format_conversion(&request, value, decimals))
}

/// Runs the `convert` command.
pub async fn run<P: RateProvider>(
    converter: &Converter<P>,
    amount: &str,
    from: &str,
    to: &str,
    decimals: usize,
) -> Result<()> {
    match convert_line(converter, amount, from, to, decimals).await {
        Ok(line) => {
            println!("{line}");
            Ok(())
        }
        Err(e) => {
            let message = ui::user_message(&e);
            if message == e.to_string() {
                Err(anyhow::Error::new(e))
            } else {
                Err(anyhow::Error::new(e).context(message))
            }
        }
    }
}
