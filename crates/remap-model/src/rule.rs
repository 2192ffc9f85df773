//! Column mapping rules.
//!
//! Rules arrive as flat, header-keyed rows ([`RawMappingRule`]) and are parsed
//! once into the closed [`RuleKind`] sum type. Parsing never fails: type tags
//! the engine does not know become `Unrecognized` variants, which resolve to the
//! missing sentinel so a partial configuration still produces inspectable
//! output.

use serde::{Deserialize, Serialize};

/// `Column_Type` marker for rules that contribute to primary-key identity.
pub const PRIMARY_KEY_MARKER: &str = "PK";

/// Rule row exactly as it appears in a mapping file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMappingRule {
    #[serde(rename = "Table")]
    pub table: String,
    #[serde(rename = "Column")]
    pub column: String,
    #[serde(rename = "Column_Type")]
    pub column_type: String,
    #[serde(rename = "Type")]
    pub rule_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Mapped_Column")]
    pub mapped_column: String,
    #[serde(rename = "Mapped_Concat")]
    pub mapped_concat: String,
    #[serde(rename = "Mapped_Condition")]
    pub mapped_condition: String,
    #[serde(rename = "Mapped_Condition_Type")]
    pub mapped_condition_type: String,
    #[serde(rename = "Mapped_If")]
    pub mapped_if: String,
    #[serde(rename = "Mapped_If_Type")]
    pub mapped_if_type: String,
    #[serde(rename = "Mapped_Else")]
    pub mapped_else: String,
    #[serde(rename = "Mapped_Else_Type")]
    pub mapped_else_type: String,
    #[serde(rename = "Mapped_Lookup_Table")]
    pub mapped_lookup_table: String,
    #[serde(rename = "Mapped_Lookup_Column")]
    pub mapped_lookup_column: String,
    #[serde(rename = "Mapped_Lookup_Fallback")]
    pub mapped_lookup_fallback: String,
    #[serde(rename = "Id_Column")]
    pub id_column: String,
    #[serde(rename = "Id_Lookup")]
    pub id_lookup: String,
    #[serde(rename = "Id_Table")]
    pub id_table: String,
    #[serde(rename = "Id_Increment")]
    pub id_increment: String,
    #[serde(rename = "Id_Primary_Key_1_Column")]
    pub id_primary_key_1_column: String,
    #[serde(rename = "Id_Primary_Key_1_Value")]
    pub id_primary_key_1_value: String,
    #[serde(rename = "Id_Primary_Key_2_Column")]
    pub id_primary_key_2_column: String,
    #[serde(rename = "Id_Primary_Key_2_Value")]
    pub id_primary_key_2_value: String,
    #[serde(rename = "Id_Primary_Key_3_Column")]
    pub id_primary_key_3_column: String,
    #[serde(rename = "Id_Primary_Key_3_Value")]
    pub id_primary_key_3_value: String,
    #[serde(rename = "Record")]
    pub record: String,
}

/// A parsed, immutable mapping rule for one output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    pub table: String,
    pub column: String,
    /// True when `Column_Type` is `PK`.
    pub primary_key: bool,
    /// Fan-out variant index (1..N) for one-to-many rules.
    pub record: Option<u32>,
    pub kind: RuleKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Literal constant.
    Value(String),
    /// Normalized value of a source column.
    Column { source: String },
    /// `D/M/Y` source value re-emitted as `YYYY-MM-DD`.
    ColumnDate { source: String },
    IfElse(IfElse),
    /// Comma-separated expression joined with `" - "`.
    Concat(Vec<Token>),
    /// Comma-separated expression divided left to right.
    Divide(Vec<Token>),
    Lookup(Lookup),
    /// Identifier continuing the rule's own table.
    Id(IdRule),
    /// Identifier continuing another table (`IdRule::id_table`).
    IdChild(IdRule),
    Unrecognized(String),
}

impl RuleKind {
    pub fn tag(&self) -> &str {
        match self {
            Self::Value(_) => "VALUE",
            Self::Column { .. } => "COLUMN",
            Self::ColumnDate { .. } => "COLUMN_DATE",
            Self::IfElse(_) => "IF_ELSE",
            Self::Concat(_) => "CONCAT",
            Self::Divide(_) => "DIVIDE",
            Self::Lookup(_) => "LOOKUP",
            Self::Id(_) => "ID",
            Self::IdChild(_) => "ID_CHILD",
            Self::Unrecognized(tag) => tag,
        }
    }
}

/// One segment of a CONCAT/DIVIDE expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// `[name]`: a source column reference.
    Column(String),
    Literal(String),
}

/// Split an expression on commas into column references and literals.
///
/// A token is a column reference when it starts with `[`; its name is the
/// token without its first and last character. Literals are kept verbatim,
/// surrounding spaces included.
pub fn tokenize(expression: &str) -> Vec<Token> {
    expression
        .split(',')
        .map(|part| {
            if part.starts_with('[') {
                let mut chars = part.chars();
                chars.next();
                chars.next_back();
                Token::Column(chars.as_str().to_string())
            } else {
                Token::Literal(part.to_string())
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfElse {
    /// Source column the condition is evaluated against.
    pub source: String,
    pub condition: Condition,
    pub then: Branch,
    pub otherwise: Branch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Equal(String),
    NotNull,
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Value(String),
    Column(String),
    Concat(Vec<Token>),
    Divide(Vec<Token>),
    Unrecognized(String),
}

impl Branch {
    fn parse(branch_type: &str, operand: &str) -> Self {
        match branch_type.trim() {
            "VALUE" => Self::Value(operand.to_string()),
            "COLUMN" => Self::Column(operand.to_string()),
            "CONCAT" => Self::Concat(tokenize(operand)),
            "DIVIDE" => Self::Divide(tokenize(operand)),
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookup {
    /// Reference table holding `LOOKUP_VALUE`/`LOOKUP_RESULT` rows.
    pub table: String,
    /// Input column whose value is looked up.
    pub source: String,
    pub fallback: String,
}

/// A key pair for identifier assignment: output column in the bucket being
/// searched, and the input column supplying the value to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdKey {
    pub column: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRule {
    /// Identifier column read from matching rows.
    pub id_column: String,
    /// Reference table consulted when the in-progress bucket has no match.
    pub fallback_table: String,
    /// Table whose in-progress bucket is searched (ID_CHILD only).
    pub id_table: Option<String>,
    pub increment: i64,
    pub keys: Vec<IdKey>,
}

impl MappingRule {
    pub fn from_raw(raw: &RawMappingRule) -> Self {
        let kind = match raw.rule_type.trim() {
            "VALUE" => RuleKind::Value(raw.value.clone()),
            "COLUMN" => RuleKind::Column {
                source: raw.mapped_column.clone(),
            },
            "COLUMN_DATE" => RuleKind::ColumnDate {
                source: raw.mapped_column.clone(),
            },
            "IF_ELSE" => RuleKind::IfElse(IfElse {
                source: raw.mapped_column.clone(),
                condition: match raw.mapped_condition_type.trim() {
                    "EQUAL" => Condition::Equal(raw.mapped_condition.clone()),
                    "NOT NULL" | "NOT_NULL" => Condition::NotNull,
                    other => Condition::Unrecognized(other.to_string()),
                },
                then: Branch::parse(&raw.mapped_if_type, &raw.mapped_if),
                otherwise: Branch::parse(&raw.mapped_else_type, &raw.mapped_else),
            }),
            "CONCAT" => RuleKind::Concat(tokenize(&raw.mapped_concat)),
            "DIVIDE" => RuleKind::Divide(tokenize(&raw.mapped_concat)),
            "LOOKUP" => RuleKind::Lookup(Lookup {
                table: raw.mapped_lookup_table.trim().to_string(),
                source: raw.mapped_lookup_column.clone(),
                fallback: raw.mapped_lookup_fallback.clone(),
            }),
            "ID" => RuleKind::Id(id_rule(raw, None)),
            "ID_CHILD" => RuleKind::IdChild(id_rule(raw, Some(raw.id_table.trim().to_string()))),
            other => RuleKind::Unrecognized(other.to_string()),
        };
        Self {
            table: raw.table.trim().to_string(),
            column: raw.column.trim().to_string(),
            primary_key: raw.column_type.trim() == PRIMARY_KEY_MARKER,
            record: raw.record.trim().parse::<u32>().ok(),
            kind,
        }
    }
}

fn id_rule(raw: &RawMappingRule, id_table: Option<String>) -> IdRule {
    let pairs = [
        (&raw.id_primary_key_1_column, &raw.id_primary_key_1_value),
        (&raw.id_primary_key_2_column, &raw.id_primary_key_2_value),
        (&raw.id_primary_key_3_column, &raw.id_primary_key_3_value),
    ];
    IdRule {
        id_column: raw.id_column.trim().to_string(),
        fallback_table: raw.id_lookup.trim().to_string(),
        id_table,
        increment: raw.id_increment.trim().parse::<i64>().unwrap_or(1),
        keys: pairs
            .into_iter()
            .map(|(column, source)| IdKey {
                column: column.trim().to_string(),
                source: source.trim().to_string(),
            })
            .collect(),
    }
}
