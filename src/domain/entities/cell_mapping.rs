use serde::Serialize;

pub const HEADER_CELL_COUNT: usize = 702;

/// Spreadsheet column labels `A..Z` followed by `AA..ZZ`.
pub fn header_cell_labels() -> Vec<String> {
    (1..=HEADER_CELL_COUNT).map(column_letter).collect()
}

/// Bijective base-26 name of a 1-based column: 1 is `A`, 27 is `AA`.
/// Zero has no name and maps to an empty string.
pub fn column_letter(index: usize) -> String {
    let mut remaining = index;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push(char::from(b'A' + (remaining % 26) as u8));
        remaining /= 26;
    }
    letters.iter().rev().collect()
}

/// Client-side row identity. Never derived from row content and never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub key: RowKey,
    pub header_cell: Option<String>,
    pub column_name: Option<String>,
}

impl MappingRow {
    pub fn empty(key: RowKey) -> Self {
        Self {
            key,
            header_cell: None,
            column_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingDetail {
    pub header_cell: String,
    pub column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataMappingPayload {
    pub table_name: String,
    pub detail: Vec<MappingDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_cover_single_and_double_letters() {
        let labels = header_cell_labels();

        assert_eq!(labels.len(), HEADER_CELL_COUNT);
        assert_eq!(labels.first().map(String::as_str), Some("A"));
        assert_eq!(labels.get(25).map(String::as_str), Some("Z"));
        assert_eq!(labels.get(26).map(String::as_str), Some("AA"));
        assert_eq!(labels.get(27).map(String::as_str), Some("AB"));
        assert_eq!(labels.last().map(String::as_str), Some("ZZ"));
    }

    #[test]
    fn column_letter_matches_spreadsheet_naming() {
        assert_eq!(column_letter(0), "");
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(53), "BA");
        assert_eq!(column_letter(702), "ZZ");
        assert_eq!(column_letter(703), "AAA");

        for (offset, label) in header_cell_labels().iter().enumerate() {
            assert_eq!(*label, column_letter(offset + 1));
        }
    }

    #[test]
    fn labels_increase_in_spreadsheet_order_without_duplicates() {
        let labels = header_cell_labels();

        for pair in labels.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert!(
                (prev.len(), prev.as_str()) < (next.len(), next.as_str()),
                "{prev} should sort before {next}"
            );
        }

        let unique = labels.iter().collect::<std::collections::BTreeSet<_>>();
        assert_eq!(unique.len(), labels.len());
    }
}
