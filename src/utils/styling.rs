//! Terminal styling utilities for the console client

use chrono::Local;
use console::{style, Emoji};

use crate::auth::Token;
use crate::config::{non_empty, AppConfig};
use crate::symbology::ConvertRequest;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static FIELDS: Emoji<'_, '_> = Emoji("🏷️  ", "");
pub static FILE: Emoji<'_, '_> = Emoji("📄 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("◆").cyan().bold(),
        style("Symbology Convert").cyan().bold()
    );
    println!(
        "    {}",
        style("Instrument identifier conversion on the data platform").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card. Secrets are masked.
pub fn print_config(config: &AppConfig, request: &ConvertRequest) {
    let box_width = 60;
    let line = "─".repeat(box_width - 2);

    let universe = if request.universe.is_empty() {
        style("(none)".to_string()).red()
    } else {
        style(truncate_string(&request.universe.join(","), 40)).white()
    };
    let fields = if request.to.is_empty() {
        style("all fields (no valid field list given)".to_string()).dim()
    } else {
        style(
            request
                .to
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(","),
        )
        .white()
    };

    println!("    ┌{}┐", line);
    println!("    │ {}", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {} Universe:  {}", GLOBE, universe);
    println!("    │  {} Fields:    {}", FIELDS, fields);
    if config.use_json_request_file {
        println!(
            "    │  {} JSON file: {}",
            FILE,
            config
                .json_request_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
    }
    if config.export_to_csv {
        println!("    │  {} CSV file:  {}", SAVE, config.csv_path().display());
    }
    println!(
        "    │  {} Method:    {}",
        LINK,
        style(if config.use_http_get { "GET" } else { "POST" }).yellow()
    );
    println!("    ├{}┤", line);
    if let Some(username) = non_empty(&config.username) {
        println!("    │  {} Username:       {}", KEY, username);
    }
    if let Some(token) = non_empty(&config.access_token) {
        println!("    │  {} Access token:   {}", KEY, mask(token));
    }
    if let Some(token) = non_empty(&config.refresh_token) {
        println!("    │  {} Refresh token:  {}", KEY, mask(token));
    }
    if let Some(url) = non_empty(&config.auth_base_url) {
        println!("    │  {} Auth URL:       {}", LINK, url);
    }
    if let Some(url) = non_empty(&config.symbology_base_url) {
        println!("    │  {} Symbology URL:  {}", LINK, url);
    }
    if config.use_proxy_server {
        println!(
            "    │  {} Proxy:          {}",
            LINK,
            non_empty(&config.proxy_server).unwrap_or("(not set)")
        );
    }
    println!("    └{}┘", line);
    println!();
}

/// Print the details of a freshly obtained token
pub fn print_token(token: &Token) {
    print_section_header("Token Details");
    println!("      Access token:  {}", mask(&token.access_token));
    println!(
        "      Expires in:    {}",
        token
            .expires_in
            .map(|s| format!("{}s", s))
            .unwrap_or_else(|| "-".to_string())
    );
    if let Some(expires_at) = token.expires_at {
        println!(
            "      Expires at:    {}",
            expires_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!(
        "      Refresh token: {}",
        token.refresh_token.as_deref().map(mask).unwrap_or_default()
    );
    println!("      Scope:         {}", token.scope.as_deref().unwrap_or_default());
    println!(
        "      Token type:    {}",
        token.token_type.as_deref().unwrap_or_default()
    );
}

/// Print a section header with styling
pub fn print_section_header(title: &str) {
    println!();
    println!("    {}", style(title).white().bold());
    print_rule();
}

/// Print a dim horizontal rule
pub fn print_rule() {
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    println!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Symbology conversion complete!").green().bold()
    );
    println!();
}

/// Keep the first and last few characters of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
