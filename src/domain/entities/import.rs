use serde::Deserialize;

use crate::domain::entities::validation::ValidationIssue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Xlsx,
    Csv,
    FormattedCsv,
}

impl FileType {
    pub const ALL: [FileType; 3] = [FileType::Xlsx, FileType::Csv, FileType::FormattedCsv];

    pub fn value(self) -> &'static str {
        match self {
            FileType::Xlsx => "xlsx",
            FileType::Csv => "csv",
            FileType::FormattedCsv => "formated_csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileType::Xlsx => "Xlsx",
            FileType::Csv => "CSV",
            FileType::FormattedCsv => "Formated CSV",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.value() == value)
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            FileType::Xlsx => "/upload",
            FileType::Csv => "/upload/csv",
            FileType::FormattedCsv => "/upload/csv-formated",
        }
    }

    pub fn is_csv(self) -> bool {
        matches!(self, FileType::Csv | FileType::FormattedCsv)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Raw import form input. Range fields hold whatever the number inputs hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportForm {
    pub table_name: Option<String>,
    pub file_type: Option<FileType>,
    pub range_start: String,
    pub range_end: String,
    pub total_row: String,
    pub start_row: String,
    pub file: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub table_name: String,
    pub file_type: FileType,
    pub file: SelectedFile,
    pub ranges: ImportRanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportRanges {
    Csv { range_start: u64, range_end: u64 },
    Xlsx { total_row: u64, start_row: u64 },
}

impl ImportRequest {
    /// Multipart text fields in submission order; the file part goes first.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("table_name", self.table_name.clone())];
        match self.ranges {
            ImportRanges::Csv {
                range_start,
                range_end,
            } => {
                fields.push(("range_start", range_start.to_string()));
                fields.push(("range_end", range_end.to_string()));
            }
            ImportRanges::Xlsx {
                total_row,
                start_row,
            } => {
                fields.push(("total_row", total_row.to_string()));
                fields.push(("range", start_row.to_string()));
            }
        }
        fields
    }
}

impl ImportForm {
    pub fn validate(&self) -> Result<ImportRequest, Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if self.file.is_none() {
            issues.push(ValidationIssue::new("file", "Please upload a file."));
        }
        let table_name = self.table_name.clone().filter(|name| !name.is_empty());
        if table_name.is_none() {
            issues.push(ValidationIssue::new("table_name", "Please select a table name"));
        }
        if self.file_type.is_none() {
            issues.push(ValidationIssue::new("file_type", "Please select a file type"));
        }

        let ranges = match self.file_type {
            Some(kind) if kind.is_csv() => {
                let start = required_number(
                    &self.range_start,
                    "range_start",
                    "Please enter range start",
                    &mut issues,
                );
                let end = required_number(
                    &self.range_end,
                    "range_end",
                    "Please enter range end",
                    &mut issues,
                );
                start.zip(end).map(|(range_start, range_end)| ImportRanges::Csv {
                    range_start,
                    range_end,
                })
            }
            Some(_) => {
                let total = required_number(
                    &self.total_row,
                    "total_row",
                    "Please enter total row number",
                    &mut issues,
                );
                let start = required_number(
                    &self.start_row,
                    "range",
                    "Please enter start row number",
                    &mut issues,
                );
                total.zip(start).map(|(total_row, start_row)| ImportRanges::Xlsx {
                    total_row,
                    start_row,
                })
            }
            None => None,
        };

        match (table_name, self.file_type, self.file.clone(), ranges) {
            (Some(table_name), Some(file_type), Some(file), Some(ranges)) if issues.is_empty() => {
                Ok(ImportRequest {
                    table_name,
                    file_type,
                    file,
                    ranges,
                })
            }
            _ => Err(issues),
        }
    }
}

fn required_number(
    raw: &str,
    field: &str,
    message: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<u64> {
    let parsed = raw.trim().parse::<u64>().ok();
    if parsed.is_none() {
        issues.push(ValidationIssue::new(field, message));
    }
    parsed
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> SelectedFile {
        SelectedFile {
            name: "orders.csv".to_string(),
            bytes: b"a,b\n1,2\n".to_vec(),
        }
    }

    #[test]
    fn csv_request_carries_range_fields() {
        let form = ImportForm {
            table_name: Some("orders".to_string()),
            file_type: Some(FileType::Csv),
            range_start: "2".to_string(),
            range_end: "40".to_string(),
            file: Some(file()),
            ..ImportForm::default()
        };

        let request = form.validate().expect("valid form");

        assert_eq!(request.file_type.endpoint(), "/upload/csv");
        assert_eq!(
            request.text_fields(),
            vec![
                ("table_name", "orders".to_string()),
                ("range_start", "2".to_string()),
                ("range_end", "40".to_string()),
            ]
        );
    }

    #[test]
    fn xlsx_request_sends_total_row_and_start_row() {
        let form = ImportForm {
            table_name: Some("orders".to_string()),
            file_type: Some(FileType::Xlsx),
            total_row: "100".to_string(),
            start_row: "3".to_string(),
            file: Some(file()),
            ..ImportForm::default()
        };

        let request = form.validate().expect("valid form");

        assert_eq!(request.file_type.endpoint(), "/upload");
        assert_eq!(
            request.text_fields(),
            vec![
                ("table_name", "orders".to_string()),
                ("total_row", "100".to_string()),
                ("range", "3".to_string()),
            ]
        );
    }

    #[test]
    fn missing_file_and_ranges_are_reported() {
        let form = ImportForm {
            table_name: Some("orders".to_string()),
            file_type: Some(FileType::FormattedCsv),
            range_start: "-1".to_string(),
            ..ImportForm::default()
        };

        let issues = form.validate().expect_err("invalid form");
        let fields = issues.iter().map(|issue| issue.field.as_str()).collect::<Vec<_>>();

        assert_eq!(fields, vec!["file", "range_start", "range_end"]);
    }

    #[test]
    fn file_type_values_round_trip() {
        for kind in FileType::ALL {
            assert_eq!(FileType::from_value(kind.value()), Some(kind));
        }
        assert_eq!(FileType::from_value("pdf"), None);
    }
}
