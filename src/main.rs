//! Symbology Convert CLI
//!
//! Signs in to the data platform, converts the configured instruments and
//! prints the result, optionally exporting it to CSV.

use anyhow::{Context, Result};
use clap::Parser;

use symbology_convert::auth::{attempt_login, AuthorizeClient, LoginOutcome};
use symbology_convert::cancel::CancelSignal;
use symbology_convert::cli::{Cli, TerminalPrompt};
use symbology_convert::config::{non_empty, resolve_config};
use symbology_convert::report::{print_conversion, PrintOptions};
use symbology_convert::symbology::{
    build_convert_request, fetch_by_get, fetch_by_post, SymbologyClient,
};
use symbology_convert::utils::{
    print_banner, print_completion, print_config, print_info, print_success, print_token,
    print_warning,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "symbology_convert=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = resolve_config(cli.config.as_deref())?.with_overrides(&cli);

    print_banner(env!("CARGO_PKG_VERSION"));

    if config.use_json_request_file {
        if let Some(path) = &config.json_request_file {
            print_info(&format!(
                "Reading and processing request message from {}",
                path.display()
            ));
        }
    }
    let built = build_convert_request(&config);
    for warning in &built.warnings {
        print_warning(warning);
    }
    print_config(&config, &built.request);

    let cancel = CancelSignal::new();
    let listener = cancel.listen_for_interrupt();

    let access_token = match non_empty(&config.access_token) {
        Some(token) => {
            print_info("Using the access token from configuration");
            token.to_string()
        }
        None => {
            let outcome = attempt_login(
                &mut config,
                &mut TerminalPrompt,
                AuthorizeClient::from_config,
                &cancel,
            )
            .await?;
            match outcome {
                LoginOutcome::Authenticated(token) => {
                    print_success("Login successful");
                    if config.verbose {
                        print_token(&token);
                    }
                    token.access_token
                }
                LoginOutcome::Cancelled => {
                    listener.abort();
                    anyhow::bail!("Login cancelled by user");
                }
            }
        }
    };

    let client = SymbologyClient::from_config(&config, access_token)?;
    let method = if config.use_http_get { "GET" } else { "POST" };
    print_info(&format!(
        "Requesting conversion of {} instrument(s) via {}",
        built.request.universe.len(),
        method
    ));

    let result = if config.use_http_get {
        fetch_by_get(&client, &built.request, config.verbose, &cancel)
            .await
            .context("Symbology conversion failed")?
    } else {
        let result = fetch_by_post(&client, &built.request, config.verbose, &cancel)
            .await
            .context("Symbology conversion failed")?;
        Some(result)
    };
    listener.abort();

    let csv_path = config.export_to_csv.then(|| config.csv_path());
    match result {
        Some(result) => print_conversion(
            &result,
            PrintOptions {
                verbose: config.verbose,
                csv_path: csv_path.as_deref(),
            },
        ),
        None => print_warning("The symbology service returned no data"),
    }

    print_completion();
    Ok(())
}
