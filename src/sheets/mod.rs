// Published-spreadsheet source adapter.
//
// Fetches one tab of a publicly published Google Sheet through the gviz
// endpoint and flattens it into loosely-typed row records. Validation of
// the rows happens separately in `sheets::validate`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

pub mod validate;

const DEFAULT_BASE_URL: &str = "https://docs.google.com";

/// A single sheet row: lower-cased, trimmed column header to raw cell value
/// (number, string, bool or null as delivered by the wire format).
pub type SheetRow = HashMap<String, Value>;

/// Adapter-level failures. Fatal to the current load attempt; each variant
/// maps to an actionable message via [`SheetError::user_message`].
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("locator does not contain a sheet id")]
    InvalidLocator,

    #[error("sheet not found")]
    NotFound,

    #[error("sheet is not published to the web")]
    NotPublic,

    #[error("could not reach the sheet host: {0}")]
    Unreachable(String),

    #[error("fetch failed with status {0}")]
    FetchFailed(u16),

    #[error("malformed sheet payload: {0}")]
    Parse(String),
}

impl SheetError {
    /// Actionable, user-facing description of the failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidLocator => {
                "That doesn't look like a spreadsheet URL. Paste the full link, e.g. https://docs.google.com/spreadsheets/d/<id>/edit"
            }
            Self::NotFound => "Sheet not found. Check that the URL is correct.",
            Self::NotPublic => {
                "The sheet is not public. Publish it via File > Share > Publish to web."
            }
            Self::Unreachable(_) => "Connection error. Check your internet connection.",
            Self::FetchFailed(_) => "Could not load the sheet. Try again in a moment.",
            Self::Parse(_) => "The sheet returned data we couldn't read. Re-publish it and try again.",
        }
    }
}

static SHEET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]{20,})").expect("valid regex"));

static ENVELOPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)google\.visualization\.Query\.setResponse\((.*)\);?\s*$").expect("valid regex")
});

/// Extracts the sheet id from a user-supplied locator.
///
/// Accepts any URL carrying a `/spreadsheets/d/{id}` path segment where the
/// id is at least 20 chars of `[A-Za-z0-9_-]` (shorter matches are junk,
/// not sheet ids).
pub fn extract_sheet_id(locator: &str) -> Result<String, SheetError> {
    SHEET_ID_RE
        .captures(locator)
        .map(|caps| caps[1].to_string())
        .ok_or(SheetError::InvalidLocator)
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    cols: Option<Vec<GvizCol>>,
    rows: Option<Vec<GvizRow>>,
}

#[derive(Debug, Deserialize)]
struct GvizCol {
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    c: Option<Vec<Option<GvizCell>>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    v: Option<Value>,
}

/// Unwraps the gviz function-call envelope and flattens the table.
///
/// A payload without the envelope means the sheet is not published
/// publicly (`NotPublic`); an enveloped payload that is not valid JSON is
/// `Parse`. A response with no `table` is a present-but-empty tab, which
/// is a valid, empty result.
pub fn parse_gviz_text(text: &str) -> Result<Vec<SheetRow>, SheetError> {
    let caps = ENVELOPE_RE.captures(text).ok_or(SheetError::NotPublic)?;
    let json: GvizResponse =
        serde_json::from_str(&caps[1]).map_err(|err| SheetError::Parse(err.to_string()))?;

    let Some(table) = json.table else {
        return Ok(Vec::new());
    };
    let (Some(cols), Some(rows)) = (table.cols, table.rows) else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = cols
        .iter()
        .enumerate()
        .map(|(index, col)| {
            let label = col
                .label
                .as_deref()
                .map(|l| l.trim().to_lowercase())
                .unwrap_or_default();
            if label.is_empty() {
                format!("col_{index}")
            } else {
                label
            }
        })
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut record = SheetRow::new();
            for (index, cell) in row.c.unwrap_or_default().into_iter().enumerate() {
                let Some(header) = headers.get(index) else {
                    continue;
                };
                let value = cell.and_then(|c| c.v).unwrap_or(Value::Null);
                record.insert(header.clone(), value);
            }
            record
        })
        .collect())
}

/// HTTP client for published sheets.
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SheetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the client at an alternate host. Tests use this to serve
    /// canned gviz payloads from a local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches one tab of a sheet as raw rows. Single attempt, no retries;
    /// the caller decides whether a retry makes sense.
    ///
    /// A missing or empty tab (e.g. no supplier sheet at gid 1) is an
    /// empty row list, not an error.
    #[instrument(skip(self))]
    pub async fn fetch_tab(&self, sheet_id: &str, gid: u32) -> Result<Vec<SheetRow>, SheetError> {
        let url = format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:json&gid={}",
            self.base_url, sheet_id, gid
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| SheetError::Unreachable(err.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SheetError::NotFound);
        }
        if !status.is_success() {
            return Err(SheetError::FetchFailed(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|err| SheetError::Unreachable(err.to_string()))?;

        parse_gviz_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SHEET_ID: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";

    #[test]
    fn extracts_id_from_edit_and_gviz_urls() {
        let edit = format!("https://docs.google.com/spreadsheets/d/{SHEET_ID}/edit#gid=0");
        let gviz = format!("https://docs.google.com/spreadsheets/d/{SHEET_ID}/gviz/tq");
        assert_eq!(extract_sheet_id(&edit).unwrap(), SHEET_ID);
        assert_eq!(extract_sheet_id(&gviz).unwrap(), SHEET_ID);
    }

    #[test]
    fn rejects_locators_without_a_plausible_id() {
        assert_matches!(
            extract_sheet_id("https://example.com/not-a-sheet"),
            Err(SheetError::InvalidLocator)
        );
        // Present but far too short to be a real sheet id.
        assert_matches!(
            extract_sheet_id("https://docs.google.com/spreadsheets/d/abc123/edit"),
            Err(SheetError::InvalidLocator)
        );
    }

    fn envelope(body: &str) -> String {
        format!("/*O_o*/\ngoogle.visualization.Query.setResponse({body});")
    }

    #[test]
    fn missing_envelope_means_not_public() {
        let html = "<html><body>Sign in to continue</body></html>";
        assert_matches!(parse_gviz_text(html), Err(SheetError::NotPublic));
    }

    #[test]
    fn bad_json_inside_envelope_is_a_parse_error() {
        assert_matches!(
            parse_gviz_text(&envelope("{table: nope")),
            Err(SheetError::Parse(_))
        );
    }

    #[test]
    fn missing_table_is_an_empty_tab() {
        let rows = parse_gviz_text(&envelope("{\"status\":\"ok\"}")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn flattens_rows_with_lowercased_headers_and_null_cells() {
        let body = r#"{
            "table": {
                "cols": [{"label": " SKU "}, {"label": "Price"}, {"label": ""}],
                "rows": [
                    {"c": [{"v": "ABC-1"}, {"v": 19.9}, {"v": "x"}]},
                    {"c": [{"v": "ABC-2"}, null, null]}
                ]
            }
        }"#;
        let rows = parse_gviz_text(&envelope(body)).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0]["sku"], Value::String("ABC-1".into()));
        assert_eq!(rows[0]["price"], serde_json::json!(19.9));
        // Blank labels fall back to positional names.
        assert_eq!(rows[0]["col_2"], Value::String("x".into()));

        assert_eq!(rows[1]["sku"], Value::String("ABC-2".into()));
        assert_eq!(rows[1]["price"], Value::Null);
    }
}
