//! Convert-call wrappers used by the application
//!
//! Both print the outgoing request in verbose mode and race the call
//! against the cancel signal.

use std::future::Future;

use console::style;

use super::{ConversionResult, ConvertRequest, MessageFormat, SymbologyClient, SymbologyError};
use crate::cancel::CancelSignal;

/// Convert over HTTP POST. An empty response is an error.
pub async fn fetch_by_post(
    client: &SymbologyClient,
    request: &ConvertRequest,
    verbose: bool,
    cancel: &CancelSignal,
) -> Result<ConversionResult, SymbologyError> {
    if verbose {
        print_convert_request(request);
    }

    race(cancel, client.post_convert(request, MessageFormat::NoMessages))
        .await?
        .ok_or(SymbologyError::EmptyResponse)
}

/// Convert over HTTP GET. An empty response comes back as `Ok(None)`.
pub async fn fetch_by_get(
    client: &SymbologyClient,
    request: &ConvertRequest,
    verbose: bool,
    cancel: &CancelSignal,
) -> Result<Option<ConversionResult>, SymbologyError> {
    if verbose {
        print_convert_request(request);
    }

    let universe = request.universe.join(",");
    race(
        cancel,
        client.get_convert(&universe, &request.to, MessageFormat::NoMessages),
    )
    .await
}

async fn race<T, F>(cancel: &CancelSignal, call: F) -> Result<T, SymbologyError>
where
    F: Future<Output = Result<T, SymbologyError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SymbologyError::Cancelled),
        result = call => result,
    }
}

/// Print the JSON body of a convert request.
pub fn print_convert_request(request: &ConvertRequest) {
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            println!();
            println!("    {}", style("JSON Request Body").cyan().bold());
            println!("    {}", style("─".repeat(50)).dim());
            println!("{}", json);
            println!("    {}", style("─".repeat(50)).dim());
        }
        Err(e) => tracing::warn!("Unable to serialize convert request: {}", e),
    }
}
