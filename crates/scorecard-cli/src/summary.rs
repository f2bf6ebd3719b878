use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use scorecard_cli::types::{BenchmarkResult, ColumnSummary};
use scorecard_model::{BalanceReport, OutcomeEstimate, PropensitySummary};

use crate::cli::OutputFormatArg;

pub fn print_result(result: &BenchmarkResult, format: OutputFormatArg) -> Result<()> {
    match format {
        OutputFormatArg::Table => {
            println!("Data: {}", result.data_path.display());
            println!("Rows: {} ({} focal)", result.rows, result.focal_rows);
            println!("{}", outcome_table(&result.outcomes));
            println!("{}", balance_table(&result.balance));
            println!("{}", propensity_table(&result.propensity));
        }
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(result).context("serialize result")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn print_columns(columns: &[ColumnSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Encoding"),
        header_cell("Levels"),
        header_cell("Nulls"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for column in columns {
        let encoding = match column.encoding {
            Some(label) => Cell::new(label),
            None => Cell::new("unsupported").fg(Color::Yellow),
        };
        let levels = column
            .levels
            .map_or_else(|| dim_cell("-"), Cell::new);
        let nulls = if column.nulls > 0 {
            Cell::new(column.nulls).fg(Color::Red)
        } else {
            dim_cell(0)
        };
        table.add_row(vec![
            Cell::new(&column.name).add_attribute(Attribute::Bold),
            dim_cell(&column.dtype),
            encoding,
            levels,
            nulls,
        ]);
    }
    println!("{table}");
}

fn outcome_table(outcomes: &[OutcomeEstimate]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Focal effect")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for outcome in outcomes {
        table.add_row(vec![
            Cell::new(&outcome.outcome).add_attribute(Attribute::Bold),
            effect_cell(outcome.effect),
        ]);
    }
    table
}

fn balance_table(report: &BalanceReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Covariate"),
        header_cell("Focal mean"),
        header_cell("Weighted control mean"),
        header_cell("Difference"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for stat in &report.stats {
        table.add_row(vec![
            Cell::new(&stat.covariate),
            Cell::new(stat.focal_mean),
            Cell::new(stat.weighted_control_mean),
            dim_cell(format!("{:+.4}", stat.difference())),
        ]);
    }
    table
}

fn propensity_table(summary: &PropensitySummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Propensity"),
        header_cell("Focal"),
        header_cell("Non-focal"),
        header_cell("All"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("rows"),
        Cell::new(summary.focal_count),
        Cell::new(summary.control_count),
        Cell::new(summary.focal_count + summary.control_count),
    ]);
    table.add_row(vec![
        Cell::new("mean score"),
        Cell::new(format!("{:.4}", summary.focal_mean)),
        Cell::new(format!("{:.4}", summary.control_mean)),
        Cell::new(format!("{:.4}", summary.mean)),
    ]);
    table.add_row(vec![
        Cell::new("score range"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!("{:.4} .. {:.4}", summary.min, summary.max)),
    ]);
    table.add_row(vec![
        Cell::new("effective size"),
        dim_cell("-"),
        Cell::new(format!("{:.1}", summary.control_effective_size)),
        dim_cell("-"),
    ]);
    table
}

fn effect_cell(effect: f64) -> Cell {
    let cell = Cell::new(effect).add_attribute(Attribute::Bold);
    if effect > 0.0 {
        cell.fg(Color::Green)
    } else if effect < 0.0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
