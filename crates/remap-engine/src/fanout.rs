//! Fan-out: how many output records one input record yields per table, and
//! which rule list builds each of them.

use std::collections::BTreeMap;

use remap_model::{MappingRule, Record};

use crate::error::Result;
use crate::evaluate::Resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutMode {
    /// `N` variant records built from one-to-one rules with per-variant overrides.
    Many(u32),
    /// One record built from the one-to-few rules.
    Few,
    /// One record built from the one-to-one rules.
    One,
}

/// Resolved rule lists, one per output record, in production order.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutPlan {
    mode: FanOutMode,
    variants: Vec<Vec<MappingRule>>,
}

impl FanOutPlan {
    pub fn new(
        one_to_one: &[MappingRule],
        one_to_many: &BTreeMap<u32, Vec<MappingRule>>,
        fan_out: u32,
        one_to_few: &[MappingRule],
    ) -> Self {
        if fan_out > 0 {
            let variants = (1..=fan_out)
                .map(|index| {
                    let overrides = one_to_many.get(&index).map_or(&[][..], Vec::as_slice);
                    overlay(one_to_one, overrides)
                })
                .collect();
            Self {
                mode: FanOutMode::Many(fan_out),
                variants,
            }
        } else if !one_to_few.is_empty() {
            Self {
                mode: FanOutMode::Few,
                variants: vec![one_to_few.to_vec()],
            }
        } else {
            Self {
                mode: FanOutMode::One,
                variants: vec![one_to_one.to_vec()],
            }
        }
    }

    pub fn mode(&self) -> FanOutMode {
        self.mode
    }

    pub fn variants(&self) -> &[Vec<MappingRule>] {
        &self.variants
    }
}

/// Replace each base rule with the first override targeting the same column.
///
/// Columns that appear only in `overrides` are not added; the base rule list
/// fixes the shape of the record.
pub fn overlay(base: &[MappingRule], overrides: &[MappingRule]) -> Vec<MappingRule> {
    base.iter()
        .map(|rule| {
            overrides
                .iter()
                .find(|candidate| candidate.column == rule.column)
                .unwrap_or(rule)
                .clone()
        })
        .collect()
}

/// Evaluate `rules` in order into one output record.
pub fn build_record(rules: &[MappingRule], resolver: &Resolver<'_>, input: &Record) -> Result<Record> {
    let mut record = Record::with_capacity(rules.len());
    for rule in rules {
        let value = resolver.resolve(rule, input)?;
        record.insert(rule.column.clone(), value);
    }
    Ok(record)
}
