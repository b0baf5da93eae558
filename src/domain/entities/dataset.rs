use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableName {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceColumn {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn page_count(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }
}

/// Filters picked by the user. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFilters {
    pub inserted_by: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub table_name: String,
    pub page: u32,
    pub limit: u32,
    pub inserted_by: String,
    pub start_date: String,
    pub end_date: String,
}

impl PageQuery {
    /// Fills unset filters with the session user and the month containing `today`.
    pub fn build(
        table_name: &str,
        page: u32,
        limit: u32,
        filters: &DataFilters,
        session_username: &str,
        today: NaiveDate,
    ) -> Self {
        let (start, end) = filters.date_range.unwrap_or_else(|| month_bounds(today));
        Self {
            table_name: table_name.to_string(),
            page,
            limit,
            inserted_by: filters
                .inserted_by
                .clone()
                .unwrap_or_else(|| session_username.to_string()),
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageResult {
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(rename = "totalRows", default, deserialize_with = "deserialize_count")]
    pub total_rows: u64,
}

/// Database drivers hand back ids and `COUNT(*)` either as numbers or as
/// numeric strings.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("id {number} is not an integer"))),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("id {text:?} is not an integer"))),
        other => Err(D::Error::custom(format!("unexpected id {other}"))),
    }
}

fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_u64().unwrap_or_default(),
        Some(Value::String(text)) => text.trim().parse::<u64>().unwrap_or_default(),
        _ => 0,
    })
}

pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    (first, last)
}

/// Date-picker text for the current month, matching what an unfiltered
/// page query already asks for.
pub fn default_date_inputs(today: NaiveDate) -> (String, String) {
    let (first, last) = month_bounds(today);
    (first.format(DATE_FORMAT).to_string(), last.format(DATE_FORMAT).to_string())
}

pub fn parse_date_input(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Rewrites a row's `date` field as `Mon Jan 15 2024`; unparseable dates are
/// left untouched and `null`/missing stays `null`.
pub fn format_row_dates(mut row: Row) -> Row {
    let formatted = match row.get("date") {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(text)) if text.is_empty() => Value::Null,
        Some(Value::String(text)) => match parse_backend_date(text) {
            Some(date) => Value::String(date.format("%a %b %d %Y").to_string()),
            None => Value::String(text.clone()),
        },
        Some(other) => other.clone(),
    };
    row.insert("date".to_string(), formatted);
    row
}

fn parse_backend_date(text: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(stamp.date());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Text shown in a table cell for a raw JSON value.
pub fn display_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
