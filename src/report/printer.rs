//! Terminal rendering of conversion results

use std::path::Path;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use super::csv_export::export_csv;
use crate::symbology::{cell_text, ConversionResult, Messages};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_error, print_section_header,
};

/// Shown in the terminal table for null cells
pub const DISPLAY_NULL: &str = "null";

/// What to print besides the data table, and where to export
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintOptions<'a> {
    pub verbose: bool,
    pub csv_path: Option<&'a Path>,
}

/// Build the data table: one `Title(Name)` column per header, nulls as `null`.
pub fn render_table(result: &ConversionResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        result
            .headers
            .iter()
            .map(|h| Cell::new(format!("{}({})", h.title, h.name)).add_attribute(Attribute::Bold)),
    );

    for row in &result.data {
        table.add_row(row.iter().map(|value| match cell_text(value) {
            Some(text) => Cell::new(text),
            None => Cell::new(DISPLAY_NULL).fg(Color::DarkGrey),
        }));
    }
    table
}

/// Print everything in `result`, then export to CSV when a path is given.
///
/// Export failures are reported and logged, never returned.
pub fn print_conversion(result: &ConversionResult, options: PrintOptions<'_>) {
    if options.verbose {
        match serde_json::to_string_pretty(result) {
            Ok(json) => {
                print_section_header("Response Body in JSON Format");
                println!("{}", json);
            }
            Err(e) => tracing::warn!("Unable to serialize conversion result: {}", e),
        }
    }

    print_section_header("Universe List");
    for entity in &result.universe {
        println!(
            "      Common Name:          {}",
            entity.common_name.as_deref().unwrap_or_default()
        );
        println!(
            "      Instrument:           {}",
            entity.instrument.as_deref().unwrap_or_default()
        );
        println!(
            "      Organization Perm ID: {}",
            entity
                .organization_perm_id
                .as_ref()
                .and_then(cell_text)
                .unwrap_or_default()
        );
        println!(
            "      Reporting Currency:   {}",
            entity.reporting_currency.as_deref().unwrap_or_default()
        );
        println!();
    }

    print_section_header("Conversion Result");
    println!("      Row Count: {}", style(result.row_count()).yellow().bold());
    println!();
    for line in render_table(result).to_string().lines() {
        println!("    {}", line);
    }

    if let Some(messages) = &result.messages {
        print_messages(messages);
    }

    if let Some(path) = options.csv_path {
        export_with_feedback(result, path);
    }
}

fn print_messages(messages: &Messages) {
    print_section_header("Messages");
    println!("      {}", style("Codes").white().bold());
    for (row, codes) in messages.codes.iter().enumerate() {
        let codes: Vec<String> = codes.iter().map(i64::to_string).collect();
        println!("        row {}: [{}]", row, codes.join(", "));
    }

    println!("      {}", style("Descriptions").white().bold());
    for description in &messages.descriptions {
        println!(
            "        {} {}",
            style(format!("{:>4}", description.code)).yellow(),
            description.description
        );
    }
}

fn export_with_feedback(result: &ConversionResult, path: &Path) {
    println!();
    let spinner = create_spinner(&format!("Exporting data to CSV file {}", path.display()));
    match export_csv(result, path) {
        Ok(()) => finish_with_success(
            &spinner,
            &format!("Writing data to {} complete", path.display()),
        ),
        Err(e) => {
            finish_with_warning(&spinner, "CSV export failed");
            tracing::error!("CSV export to {} failed: {:#}", path.display(), e);
            print_error(&format!("Unable to export CSV: {:#}", e));
        }
    }
}
