use serde::{Deserialize, Serialize};

/// Modifier name that configures renumbering of in-progress duplicates.
pub const RENUMBER_MODIFIER: &str = "renumber_input_duplicates";

/// One entry of the ordered target table list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableEntry {
    #[serde(rename = "Table")]
    pub table: String,
    /// Table that must be processed earlier for the same input record.
    #[serde(rename = "Parent")]
    pub parent: String,
}

impl TableEntry {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            parent: String::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn parent(&self) -> Option<&str> {
        let parent = self.parent.trim();
        (!parent.is_empty()).then_some(parent)
    }
}

/// Modifier row as it appears in the modifiers file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableModifier {
    #[serde(rename = "Table")]
    pub table: String,
    #[serde(rename = "Modifier")]
    pub modifier: String,
    #[serde(rename = "Renumber_Output_Field")]
    pub renumber_output_field: String,
    #[serde(rename = "Renumber_Input_Field")]
    pub renumber_input_field: String,
    #[serde(rename = "Renumber_Comment_Field")]
    pub renumber_comment_field: String,
    #[serde(rename = "Renumber_Comment")]
    pub renumber_comment: String,
}

/// How to renumber a record that collides with in-progress output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenumberDirective {
    /// Output column receiving the `original.counter` value.
    pub output_field: String,
    /// Input column rewritten so later tables see the new value.
    pub input_field: String,
    /// Output column receiving the audit note.
    pub comment_field: String,
    /// Suffix appended to the audit note.
    pub comment: String,
}

impl TableModifier {
    /// The renumbering directive this modifier describes, if it is one.
    pub fn renumber_directive(&self) -> Option<RenumberDirective> {
        if self.modifier.trim() != RENUMBER_MODIFIER {
            return None;
        }
        Some(RenumberDirective {
            output_field: self.renumber_output_field.trim().to_string(),
            input_field: self.renumber_input_field.trim().to_string(),
            comment_field: self.renumber_comment_field.trim().to_string(),
            comment: self.renumber_comment.clone(),
        })
    }
}
