use serde::{Deserialize, Serialize};

/// Filter row exactly as it appears in the table filter file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTableFilter {
    #[serde(rename = "Table")]
    pub table: String,
    #[serde(rename = "Filter_Column")]
    pub filter_column: String,
    #[serde(rename = "Filter_Type")]
    pub filter_type: String,
    #[serde(rename = "Filter_Value")]
    pub filter_value: String,
}

/// A table-scoped inclusion predicate over one input column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    pub table: String,
    pub column: String,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Equal(String),
    NotEqual(String),
    Null,
    NotNull,
    /// Unknown `Filter_Type`; never excludes a record.
    Unrecognized(String),
}

impl TableFilter {
    pub fn from_raw(raw: &RawTableFilter) -> Self {
        let kind = match raw.filter_type.trim() {
            "EQUAL" => FilterKind::Equal(raw.filter_value.clone()),
            "NOT_EQUAL" => FilterKind::NotEqual(raw.filter_value.clone()),
            "NULL" => FilterKind::Null,
            "NOT_NULL" => FilterKind::NotNull,
            other => FilterKind::Unrecognized(other.to_string()),
        };
        Self {
            table: raw.table.trim().to_string(),
            column: raw.filter_column.trim().to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_types() {
        let raw = RawTableFilter {
            table: " T ".to_string(),
            filter_column: "status".to_string(),
            filter_type: "NOT_EQUAL".to_string(),
            filter_value: "closed".to_string(),
        };
        let filter = TableFilter::from_raw(&raw);
        assert_eq!(filter.table, "T");
        assert_eq!(filter.kind, FilterKind::NotEqual("closed".to_string()));

        let raw = RawTableFilter {
            filter_type: "BETWEEN".to_string(),
            ..raw
        };
        assert_eq!(
            TableFilter::from_raw(&raw).kind,
            FilterKind::Unrecognized("BETWEEN".to_string())
        );
    }
}
