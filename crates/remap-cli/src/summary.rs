use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use remap_engine::{FanOutMode, TableRules};
use remap_model::{FilterKind, TableFilter};

use crate::types::{InspectResult, RunResult};

pub fn print_run_summary(result: &RunResult) {
    println!("Config: {}", result.config.display());
    if result.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    println!("{}", run_table(result));
    println!(
        "Processed {} input records in {:.2}s",
        result.summary.records,
        result.duration.as_secs_f64()
    );
}

/// Per-table bucket counts with a closing TOTAL row.
pub fn run_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Accepted"),
        header_cell("Renumbered"),
        header_cell("Resolved"),
        header_cell("Unresolved"),
        header_cell("Written"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 5, CellAlignment::Center);

    for summary in &result.summary.tables {
        let written = result
            .outputs
            .iter()
            .any(|outputs| outputs.table == summary.table);
        table.add_row(vec![
            Cell::new(&summary.table).add_attribute(Attribute::Bold),
            Cell::new(summary.accepted),
            count_cell(summary.renumbered, Color::Yellow),
            count_cell(summary.duplicates_resolved, Color::Green),
            count_cell(summary.duplicates_unresolved, Color::Red),
            written_cell(written),
        ]);
    }
    let total = result.summary.total();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total.accepted).add_attribute(Attribute::Bold),
        count_cell(total.renumbered, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(total.merged, Color::Green).add_attribute(Attribute::Bold),
        count_cell(total.flagged, Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn print_inspect(result: &InspectResult) {
    println!("Config: {}", result.config.display());
    println!("Input: {}", result.input_file.display());
    if result.reference_tables.is_empty() {
        println!("Reference tables: none");
    } else {
        println!("Reference tables: {}", result.reference_tables.join(", "));
    }
    println!("{}", catalog_table(result));
}

/// One row per target table in processing order.
pub fn catalog_table(result: &InspectResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Table"),
        header_cell("Parent"),
        header_cell("Fan-out"),
        header_cell("Rules"),
        header_cell("Primary key"),
        header_cell("Filters"),
        header_cell("Renumber"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for (position, rules) in result.catalog.tables().iter().enumerate() {
        table.add_row(vec![
            dim_cell(position + 1),
            Cell::new(&rules.name).add_attribute(Attribute::Bold),
            optional_cell(rules.parent.as_deref()),
            Cell::new(fan_out_label(rules)),
            Cell::new(rules.rules().count()),
            optional_cell(Some(rules.primary_key.join(", ").as_str())),
            optional_cell(Some(filters_label(&rules.filters).as_str())),
            optional_cell(
                rules
                    .renumber
                    .as_ref()
                    .map(|directive| {
                        format!("{} <- {}", directive.output_field, directive.input_field)
                    })
                    .as_deref(),
            ),
        ]);
    }
    table
}

fn fan_out_label(rules: &TableRules) -> String {
    match rules.plan.mode() {
        FanOutMode::Many(count) => format!("1:{count}"),
        FanOutMode::Few => "1:few".to_string(),
        FanOutMode::One => "1:1".to_string(),
    }
}

fn filters_label(filters: &[TableFilter]) -> String {
    filters
        .iter()
        .map(|filter| match &filter.kind {
            FilterKind::Equal(value) => format!("{} = {value}", filter.column),
            FilterKind::NotEqual(value) => format!("{} != {value}", filter.column),
            FilterKind::Null => format!("{} is null", filter.column),
            FilterKind::NotNull => format!("{} not null", filter.column),
            FilterKind::Unrecognized(tag) => format!("{} {tag}?", filter.column),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) if !text.is_empty() => Cell::new(text),
        _ => dim_cell("-"),
    }
}

fn written_cell(written: bool) -> Cell {
    if written {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
