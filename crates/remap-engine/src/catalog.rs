//! Rule catalog: mapping rules, filters and modifiers indexed per target table.
//!
//! The catalog is built once before processing and is read-only afterwards.
//! Building it also validates the table processing order: a table's parent
//! must be listed, and listed earlier, so renumbered input fields are visible
//! to child tables of the same input record.

use std::collections::{BTreeMap, HashMap, HashSet};

use remap_model::{
    FilterKind, MappingRule, RenumberDirective, RuleKind, TableEntry, TableFilter, TableModifier,
};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::fanout::FanOutPlan;

/// Every rule, filter and modifier of a project, unindexed.
#[derive(Debug, Clone, Default)]
pub struct RuleSources {
    pub one_to_one: Vec<MappingRule>,
    pub one_to_many: Vec<MappingRule>,
    pub one_to_few: Vec<MappingRule>,
    pub filters: Vec<TableFilter>,
    pub modifiers: Vec<TableModifier>,
}

/// Rules of one target table.
#[derive(Debug, Clone)]
pub struct TableRules {
    pub name: String,
    pub parent: Option<String>,
    pub one_to_one: Vec<MappingRule>,
    /// One-to-many rules keyed by their `Record` index.
    pub one_to_many: BTreeMap<u32, Vec<MappingRule>>,
    pub one_to_few: Vec<MappingRule>,
    pub filters: Vec<TableFilter>,
    /// Columns forming the table's primary-key identity.
    pub primary_key: Vec<String>,
    /// Highest `Record` index among one-to-many rules; 0 when there are none.
    pub fan_out: u32,
    pub renumber: Option<RenumberDirective>,
    pub plan: FanOutPlan,
}

impl TableRules {
    fn build(entry: &TableEntry, sources: &RuleSources) -> Self {
        let name = entry.table.trim().to_string();
        let for_table = |rules: &[MappingRule]| -> Vec<MappingRule> {
            rules.iter().filter(|rule| rule.table == name).cloned().collect()
        };
        let one_to_one = for_table(&sources.one_to_one);
        let one_to_few = for_table(&sources.one_to_few);

        let mut one_to_many: BTreeMap<u32, Vec<MappingRule>> = BTreeMap::new();
        for rule in sources.one_to_many.iter().filter(|rule| rule.table == name) {
            match rule.record {
                Some(index) if index > 0 => one_to_many.entry(index).or_default().push(rule.clone()),
                _ => warn!(
                    table = %name,
                    column = %rule.column,
                    "one-to-many rule without a Record index is ignored"
                ),
            }
        }
        let fan_out = one_to_many.keys().next_back().copied().unwrap_or(0);
        if fan_out > 0 && one_to_one.is_empty() {
            warn!(table = %name, "one-to-many rules without one-to-one rules produce empty records");
        }

        let primary_key = primary_key_columns(&one_to_one, &one_to_few);

        let filters: Vec<TableFilter> = sources
            .filters
            .iter()
            .filter(|filter| filter.table == name)
            .cloned()
            .collect();
        for filter in &filters {
            if let FilterKind::Unrecognized(kind) = &filter.kind {
                warn!(table = %name, filter_type = %kind, "unknown filter type never excludes a record");
            }
        }

        let renumber = renumber_directive(&name, &sources.modifiers);
        let plan = FanOutPlan::new(&one_to_one, &one_to_many, fan_out, &one_to_few);

        Self {
            parent: entry.parent().map(str::to_string),
            name,
            one_to_one,
            one_to_many,
            one_to_few,
            filters,
            primary_key,
            fan_out,
            renumber,
            plan,
        }
    }

    /// All rules of the table, across rule classes.
    pub fn rules(&self) -> impl Iterator<Item = &MappingRule> {
        self.one_to_one
            .iter()
            .chain(self.one_to_many.values().flatten())
            .chain(self.one_to_few.iter())
    }
}

/// Primary keys come from the one-to-one rules when any carry the marker,
/// otherwise from the one-to-few rules.
fn primary_key_columns(one_to_one: &[MappingRule], one_to_few: &[MappingRule]) -> Vec<String> {
    let from = |rules: &[MappingRule]| -> Vec<String> {
        rules
            .iter()
            .filter(|rule| rule.primary_key)
            .map(|rule| rule.column.clone())
            .collect()
    };
    let columns = from(one_to_one);
    if columns.is_empty() {
        from(one_to_few)
    } else {
        columns
    }
}

fn renumber_directive(table: &str, modifiers: &[TableModifier]) -> Option<RenumberDirective> {
    let mut directive = None;
    for modifier in modifiers.iter().filter(|modifier| modifier.table.trim() == table) {
        match modifier.renumber_directive() {
            Some(found) if directive.is_none() => directive = Some(found),
            Some(_) => warn!(table, "additional renumber modifier ignored"),
            None => warn!(table, modifier = %modifier.modifier, "unknown modifier ignored"),
        }
    }
    directive
}

/// Per-table rule index in processing order.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    tables: Vec<TableRules>,
    index: HashMap<String, usize>,
}

impl RuleCatalog {
    pub fn build(tables: &[TableEntry], sources: &RuleSources) -> Result<Self> {
        validate_order(tables)?;

        let mut catalog = Self::default();
        for entry in tables {
            let rules = TableRules::build(entry, sources);
            debug!(
                table = %rules.name,
                one_to_one = rules.one_to_one.len(),
                one_to_few = rules.one_to_few.len(),
                fan_out = rules.fan_out,
                filters = rules.filters.len(),
                "indexed table rules"
            );
            catalog.index.insert(rules.name.clone(), catalog.tables.len());
            catalog.tables.push(rules);
        }
        catalog.warn_on_rule_issues(sources);
        Ok(catalog)
    }

    pub fn tables(&self) -> &[TableRules] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableRules> {
        self.index.get(name).map(|&idx| &self.tables[idx])
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn warn_on_rule_issues(&self, sources: &RuleSources) {
        let all_rules = sources
            .one_to_one
            .iter()
            .chain(&sources.one_to_many)
            .chain(&sources.one_to_few);
        for rule in all_rules {
            if self.position(&rule.table).is_none() {
                warn!(table = %rule.table, column = %rule.column, "rule for a table outside the table list is ignored");
            }
        }

        for (position, table) in self.tables.iter().enumerate() {
            for rule in table.rules() {
                match &rule.kind {
                    RuleKind::IdChild(id) => {
                        let id_table = id.id_table.as_deref().unwrap_or_default();
                        match self.position(id_table) {
                            None => warn!(
                                table = %table.name,
                                column = %rule.column,
                                id_table,
                                "ID_CHILD refers to a table outside the run; only the fallback table is searched"
                            ),
                            Some(target) if target > position => warn!(
                                table = %table.name,
                                column = %rule.column,
                                id_table,
                                "ID_CHILD refers to a table processed later"
                            ),
                            Some(_) => {}
                        }
                    }
                    RuleKind::Unrecognized(tag) => warn!(
                        table = %table.name,
                        column = %rule.column,
                        rule_type = %tag,
                        "unknown rule type resolves to the missing value"
                    ),
                    _ => {}
                }
            }
        }
    }
}

/// Reject duplicate tables and parents that are unknown or listed later.
pub fn validate_order(tables: &[TableEntry]) -> Result<()> {
    let all: HashSet<&str> = tables.iter().map(|entry| entry.table.trim()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(tables.len());
    for entry in tables {
        let name = entry.table.trim();
        if !seen.insert(name) {
            return Err(EngineError::DuplicateTable(name.to_string()));
        }
        if let Some(parent) = entry.parent() {
            if parent == name || (!seen.contains(parent) && all.contains(parent)) {
                return Err(EngineError::ParentAfterChild {
                    table: name.to_string(),
                    parent: parent.to_string(),
                });
            }
            if !all.contains(parent) {
                return Err(EngineError::UnknownParent {
                    table: name.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_must_come_first() {
        let ok = [TableEntry::new("A"), TableEntry::new("B").with_parent("A")];
        assert!(validate_order(&ok).is_ok());

        let reversed = [TableEntry::new("B").with_parent("A"), TableEntry::new("A")];
        assert!(matches!(
            validate_order(&reversed),
            Err(EngineError::ParentAfterChild { .. })
        ));

        let unknown = [TableEntry::new("B").with_parent("Z")];
        assert!(matches!(
            validate_order(&unknown),
            Err(EngineError::UnknownParent { .. })
        ));

        let duplicate = [TableEntry::new("A"), TableEntry::new("A")];
        assert!(matches!(
            validate_order(&duplicate),
            Err(EngineError::DuplicateTable(name)) if name == "A"
        ));
    }
}
