//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Symbology Convert - sign in to the data platform and convert instrument identifiers
#[derive(Parser, Debug)]
#[command(name = "symbology-convert")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML).
    /// Defaults to ./symbology.toml, then the user config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Machine ID or username (email). Prompted for when not provided.
    #[arg(short, long)]
    pub username: Option<String>,

    /// Client ID / AppKey. Prompted for when not provided.
    #[arg(long)]
    pub client_id: Option<String>,

    /// Instrument identifiers to convert (comma-separated)
    #[arg(long)]
    pub universe: Option<String>,

    /// Target fields (comma-separated).
    /// Options: CUSIP, ISIN, SEDOL, RIC, ticker, lipperID, IMO, OAPermID
    #[arg(long)]
    pub to: Option<String>,

    /// File with one identifier per line (first 99 non-blank lines are used).
    /// Replaces --universe when given.
    #[arg(long)]
    pub universe_file: Option<PathBuf>,

    /// JSON request file containing `universe` and `to` arrays
    #[arg(long)]
    pub json_request: Option<PathBuf>,

    /// Export the conversion result to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Use HTTP GET instead of POST for the convert call
    #[arg(long, default_value = "false")]
    pub get: bool,

    /// Print request and response bodies and token details
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}
