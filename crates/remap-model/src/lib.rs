//! Data model for declarative record migration: values, records, mapping
//! rules, table filters, result buckets and reference data.

pub mod error;
pub mod filter;
pub mod record;
pub mod reference;
pub mod result;
pub mod rule;
pub mod table;
pub mod value;

pub use error::{ModelError, Result};
pub use filter::{FilterKind, RawTableFilter, TableFilter};
pub use record::Record;
pub use reference::ReferenceDataset;
pub use result::{Bucket, IN_PROGRESS_PREFIX, REFERENCE_PREFIX, ResultStore, TableResultSet};
pub use rule::{
    Branch, Condition, IdKey, IdRule, IfElse, Lookup, MappingRule, PRIMARY_KEY_MARKER,
    RawMappingRule, RuleKind, Token, tokenize,
};
pub use table::{RENUMBER_MODIFIER, RenumberDirective, TableEntry, TableModifier};
pub use value::{MISSING_SENTINEL, Value, format_number};
