//! End-to-end runs through catalog, fan-out and duplicate classification.

use remap_engine::{
    EngineError, EngineOptions, FanOutMode, RuleCatalog, RuleSources, run_records,
};
use remap_model::{
    MappingRule, RawMappingRule, RawTableFilter, Record, ReferenceDataset, TableEntry,
    TableFilter, TableModifier, Value,
};

fn rule(table: &str, column: &str, rule_type: &str) -> RawMappingRule {
    RawMappingRule {
        table: table.to_string(),
        column: column.to_string(),
        rule_type: rule_type.to_string(),
        ..RawMappingRule::default()
    }
}

fn column(table: &str, column: &str, source: &str) -> RawMappingRule {
    RawMappingRule {
        mapped_column: source.to_string(),
        ..rule(table, column, "COLUMN")
    }
}

fn value(table: &str, column: &str, literal: &str) -> RawMappingRule {
    RawMappingRule {
        value: literal.to_string(),
        ..rule(table, column, "VALUE")
    }
}

fn pk(mut raw: RawMappingRule) -> RawMappingRule {
    raw.column_type = "PK".to_string();
    raw
}

fn variant(mut raw: RawMappingRule, index: u32) -> RawMappingRule {
    raw.record = index.to_string();
    raw
}

fn parse(raws: Vec<RawMappingRule>) -> Vec<MappingRule> {
    raws.iter().map(MappingRule::from_raw).collect()
}

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().map(|(k, v)| (*k, Value::from(*v))).collect()
}

fn text(record: &Record, column: &str) -> String {
    record.value_or_missing(column).to_string()
}

#[test]
fn identical_records_without_keys_merge() {
    let sources = RuleSources {
        one_to_one: parse(vec![value("T", "ID", "x"), column("T", "Name", "name")]),
        ..RuleSources::default()
    };
    let catalog = RuleCatalog::build(&[TableEntry::new("T")], &sources).expect("catalog");
    let output = run_records(
        &catalog,
        &ReferenceDataset::new(),
        EngineOptions::default(),
        vec![record(&[("name", "Bob")]), record(&[("name", "Bob")])],
    )
    .expect("run");

    let set = output.results.get("T").expect("T");
    assert_eq!(set.accepted, vec![record(&[("ID", "x"), ("Name", "Bob")])]);
    assert_eq!(set.duplicates_resolved.len(), 1);
    assert!(set.duplicates_unresolved.is_empty());
}

fn person_catalog() -> RuleCatalog {
    let sources = RuleSources {
        one_to_one: parse(vec![
            pk(column("Person", "Code", "legacy_code")),
            column("Person", "Name", "name"),
            value("Person", "Notes", ""),
            pk(column("Address", "PersonCode", "legacy_code")),
            pk(column("Address", "Street", "street")),
        ]),
        modifiers: vec![TableModifier {
            table: "Person".to_string(),
            modifier: "renumber_input_duplicates".to_string(),
            renumber_output_field: "Code".to_string(),
            renumber_input_field: "legacy_code".to_string(),
            renumber_comment_field: "Notes".to_string(),
            renumber_comment: "duplicate legacy code".to_string(),
        }],
        ..RuleSources::default()
    };
    let tables = [
        TableEntry::new("Person"),
        TableEntry::new("Address").with_parent("Person"),
    ];
    RuleCatalog::build(&tables, &sources).expect("catalog")
}

#[test]
fn renumbering_counts_per_key_and_reaches_child_tables() {
    let catalog = person_catalog();
    let input = vec![
        record(&[("legacy_code", "A7"), ("name", "Ann"), ("street", "1 Main")]),
        record(&[("legacy_code", "A7"), ("name", "Bob"), ("street", "2 High")]),
        record(&[("legacy_code", "A7"), ("name", "Cid"), ("street", "3 Low")]),
        record(&[("legacy_code", "A7"), ("name", "Ann"), ("street", "1 Main")]),
    ];
    let output = run_records(
        &catalog,
        &ReferenceDataset::new(),
        EngineOptions::default(),
        input,
    )
    .expect("run");

    let people = output.results.get("Person").expect("person");
    let codes: Vec<String> = people.accepted.iter().map(|row| text(row, "Code")).collect();
    assert_eq!(codes, vec!["A7", "A7.1", "A7.2"]);
    assert_eq!(
        text(&people.accepted[1], "Notes"),
        "A7 renumbered to A7.1. duplicate legacy code;"
    );
    assert_eq!(people.duplicates_resolved.len(), 1);

    let addresses = output.results.get("Address").expect("address");
    let parents: Vec<String> = addresses
        .accepted
        .iter()
        .map(|row| text(row, "PersonCode"))
        .collect();
    assert_eq!(parents, vec!["A7", "A7.1", "A7.2"]);

    insta::assert_json_snapshot!(output.summary, @r#"
    {
      "records": 4,
      "tables": [
        {
          "table": "Person",
          "accepted": 3,
          "duplicates_resolved": 1,
          "duplicates_unresolved": 0,
          "renumbered": 2
        },
        {
          "table": "Address",
          "accepted": 3,
          "duplicates_resolved": 1,
          "duplicates_unresolved": 0,
          "renumbered": 0
        }
      ]
    }
    "#);
}

#[test]
fn reference_collisions_are_never_renumbered() {
    let catalog = person_catalog();
    let reference = ReferenceDataset::new().with_table(
        "Person",
        vec![record(&[("Code", "B1"), ("Name", "Old")])],
    );
    let output = run_records(
        &catalog,
        &reference,
        EngineOptions::default(),
        vec![
            record(&[("legacy_code", "B1"), ("name", "New"), ("street", "x")]),
            record(&[("legacy_code", "B1"), ("name", "Old"), ("street", "y")]),
        ],
    )
    .expect("run");

    let people = output.results.get("Person").expect("person");
    assert!(people.accepted.is_empty());
    assert_eq!(people.duplicates_resolved.len(), 1);
    let flagged = &people.duplicates_unresolved[0];
    assert_eq!(text(flagged, "Code"), "B1");
    assert_eq!(text(flagged, "db_Name"), "Old");
    assert_eq!(output.summary.tables[0].renumbered, 0);
}

#[test]
fn in_progress_collision_without_directive_is_flagged() {
    let sources = RuleSources {
        one_to_one: parse(vec![
            pk(column("Site", "Code", "site")),
            column("Site", "Name", "site_name"),
        ]),
        ..RuleSources::default()
    };
    let catalog = RuleCatalog::build(&[TableEntry::new("Site")], &sources).expect("catalog");
    let output = run_records(
        &catalog,
        &ReferenceDataset::new(),
        EngineOptions::default(),
        vec![
            record(&[("site", "S1"), ("site_name", "North")]),
            record(&[("site", "S1"), ("site_name", "South")]),
        ],
    )
    .expect("run");

    let sites = output.results.get("Site").expect("site");
    assert_eq!(sites.accepted.len(), 1);
    let flagged = &sites.duplicates_unresolved[0];
    assert_eq!(text(flagged, "Name"), "South");
    assert_eq!(text(flagged, "output_Name"), "North");
}

#[test]
fn one_to_many_variants_are_classified_in_turn() {
    let mut seq = rule("Phone", "Seq", "ID");
    seq.id_column = "Seq".to_string();
    seq.id_primary_key_1_column = "Owner".to_string();
    seq.id_primary_key_1_value = "id".to_string();

    let sources = RuleSources {
        one_to_one: parse(vec![
            pk(column("Phone", "Owner", "id")),
            pk(value("Phone", "Kind", "home")),
            column("Phone", "Number", "home_phone"),
            seq,
        ]),
        one_to_many: parse(vec![
            variant(value("Phone", "Kind", "home"), 1),
            variant(value("Phone", "Kind", "work"), 2),
            variant(column("Phone", "Number", "work_phone"), 2),
            variant(value("Phone", "Extra", "ignored"), 2),
        ]),
        filters: vec![TableFilter::from_raw(&RawTableFilter {
            table: "Phone".to_string(),
            filter_column: "id".to_string(),
            filter_type: "NOT_NULL".to_string(),
            filter_value: String::new(),
        })],
        ..RuleSources::default()
    };
    let catalog = RuleCatalog::build(&[TableEntry::new("Phone")], &sources).expect("catalog");
    let phone = catalog.table("Phone").expect("phone");
    assert_eq!(phone.fan_out, 2);
    assert_eq!(phone.plan.mode(), FanOutMode::Many(2));

    let output = run_records(
        &catalog,
        &ReferenceDataset::new(),
        EngineOptions::default(),
        vec![
            record(&[("id", "9"), ("home_phone", "111"), ("work_phone", "222")]),
            record(&[("id", " "), ("home_phone", "333")]),
        ],
    )
    .expect("run");

    let phones = &output.results.get("Phone").expect("phone").accepted;
    assert_eq!(phones.len(), 2);
    assert_eq!(text(&phones[0], "Kind"), "home");
    assert_eq!(text(&phones[0], "Number"), "111");
    assert_eq!(text(&phones[0], "Seq"), "1");
    assert_eq!(text(&phones[1], "Kind"), "work");
    assert_eq!(text(&phones[1], "Number"), "222");
    assert_eq!(text(&phones[1], "Seq"), "2");
    assert!(!phones[1].contains("Extra"));
}

#[test]
fn one_to_few_rules_replace_one_to_one() {
    let sources = RuleSources {
        one_to_one: parse(vec![value("Tag", "Label", "one")]),
        one_to_few: parse(vec![pk(value("Tag", "Label", "few"))]),
        ..RuleSources::default()
    };
    let catalog = RuleCatalog::build(&[TableEntry::new("Tag")], &sources).expect("catalog");
    let tag = catalog.table("Tag").expect("tag");
    assert_eq!(tag.primary_key, vec!["Label".to_string()]);

    let output = run_records(
        &catalog,
        &ReferenceDataset::new(),
        EngineOptions::default(),
        vec![Record::new()],
    )
    .expect("run");
    let accepted = output.results.accepted("Tag");
    assert_eq!(text(&accepted[0], "Label"), "few");
}

#[test]
fn invalid_date_aborts_the_run() {
    let mut date = rule("Event", "On", "COLUMN_DATE");
    date.mapped_column = "date".to_string();
    let sources = RuleSources {
        one_to_one: parse(vec![date]),
        ..RuleSources::default()
    };
    let catalog = RuleCatalog::build(&[TableEntry::new("Event")], &sources).expect("catalog");
    let result = run_records(
        &catalog,
        &ReferenceDataset::new(),
        EngineOptions::default(),
        vec![record(&[("date", "1/2/2020")]), record(&[("date", "soon")])],
    );
    assert!(matches!(result, Err(EngineError::InvalidDate { .. })));
}
