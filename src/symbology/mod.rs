//! Symbology conversion: request/response model, HTTP client, request
//! builder and the fetch wrappers used by the binary.

pub mod client;
pub mod fetch;
pub mod request;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use client::{SymbologyClient, DEFAULT_SYMBOLOGY_BASE_URL};
pub use fetch::{fetch_by_get, fetch_by_post, print_convert_request};
pub use request::{build_convert_request, parse_fields, read_universe_file, BuiltRequest, MAX_UNIVERSE};

/// Identifier types the convert endpoint can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "CUSIP")]
    Cusip,
    #[serde(rename = "ISIN")]
    Isin,
    #[serde(rename = "SEDOL")]
    Sedol,
    #[serde(rename = "RIC")]
    Ric,
    #[serde(rename = "ticker")]
    Ticker,
    #[serde(rename = "lipperID")]
    LipperId,
    #[serde(rename = "IMO")]
    Imo,
    #[serde(rename = "OAPermID")]
    OaPermId,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Cusip,
        Field::Isin,
        Field::Sedol,
        Field::Ric,
        Field::Ticker,
        Field::LipperId,
        Field::Imo,
        Field::OaPermId,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Cusip => "CUSIP",
            Field::Isin => "ISIN",
            Field::Sedol => "SEDOL",
            Field::Ric => "RIC",
            Field::Ticker => "ticker",
            Field::LipperId => "lipperID",
            Field::Imo => "IMO",
            Field::OaPermId => "OAPermID",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Case-insensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("'{}' is not a valid field", s))
    }
}

/// Whether the service should attach per-row diagnostic messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    #[default]
    NoMessages,
    WithMessages,
}

impl MessageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::NoMessages => "NoMessages",
            MessageFormat::WithMessages => "WithMessages",
        }
    }
}

/// Body of the convert call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub universe: Vec<String>,
    pub to: Vec<Field>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub count: Option<u64>,
}

/// Identification of one requested instrument
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniverseEntity {
    #[serde(rename = "Common Name", default)]
    pub common_name: Option<String>,
    #[serde(rename = "Instrument", default)]
    pub instrument: Option<String>,
    /// Sent as either a string or a number
    #[serde(rename = "Organization PermID", default)]
    pub organization_perm_id: Option<Value>,
    #[serde(rename = "Reporting Currency", default)]
    pub reporting_currency: Option<String>,
}

/// Column header: machine name and display title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDescription {
    pub code: i64,
    #[serde(default)]
    pub description: String,
}

/// Diagnostics block: codes per data row, plus what each code means
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default)]
    pub codes: Vec<Vec<i64>>,
    #[serde(default)]
    pub descriptions: Vec<MessageDescription>,
}

/// Response of the convert call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default)]
    pub universe: Vec<UniverseEntity>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Messages>,
}

impl ConversionResult {
    /// Row count reported by the service, falling back to the rows received.
    pub fn row_count(&self) -> usize {
        self.links
            .as_ref()
            .and_then(|links| links.count)
            .map(|count| count as usize)
            .unwrap_or(self.data.len())
    }
}

/// Text of a data cell, or `None` for JSON null.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Errors from the symbology endpoint
#[derive(Debug, Error)]
pub enum SymbologyError {
    #[error("Symbology request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Symbology service returned an empty response")]
    EmptyResponse,

    #[error("Symbology request cancelled")]
    Cancelled,

    #[error("Failed to send symbology request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse symbology response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_parse_case_insensitive() {
        assert_eq!("isin".parse::<Field>(), Ok(Field::Isin));
        assert_eq!(" Ticker ".parse::<Field>(), Ok(Field::Ticker));
        assert_eq!("OAPERMID".parse::<Field>(), Ok(Field::OaPermId));
        assert!("FIGI".parse::<Field>().is_err());
    }

    #[test]
    fn test_convert_request_wire_format() {
        let request = ConvertRequest {
            universe: vec!["IBM.N".to_string()],
            to: vec![Field::Isin, Field::LipperId],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"universe": ["IBM.N"], "to": ["ISIN", "lipperID"]})
        );
    }

    #[test]
    fn test_conversion_result_deserialization() {
        let body = json!({
            "links": {"count": 1},
            "universe": [{
                "Common Name": "INTERNATIONAL BUSINESS MACHINES CORP",
                "Instrument": "IBM.N",
                "Organization PermID": "4295904307",
                "Reporting Currency": "USD"
            }],
            "headers": [
                {"name": "RIC", "title": "RIC"},
                {"name": "ISIN", "title": "ISIN"}
            ],
            "data": [["IBM.N", null]],
            "messages": {
                "codes": [[-1, -2]],
                "descriptions": [{"code": -2, "description": "empty"}]
            }
        });

        let result: ConversionResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.universe[0].instrument.as_deref(), Some("IBM.N"));
        assert_eq!(result.headers[1].title, "ISIN");
        assert_eq!(cell_text(&result.data[0][0]).as_deref(), Some("IBM.N"));
        assert_eq!(cell_text(&result.data[0][1]), None);
        assert_eq!(result.messages.unwrap().descriptions[0].code, -2);
    }

    #[test]
    fn test_row_count_falls_back_to_data() {
        let result = ConversionResult {
            data: vec![vec![json!(1)], vec![json!(2)]],
            ..Default::default()
        };
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn test_cell_text_numbers() {
        assert_eq!(cell_text(&json!(1)).as_deref(), Some("1"));
        assert_eq!(cell_text(&json!(true)).as_deref(), Some("true"));
    }
}
