use std::collections::BTreeMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::Styler;
use crate::board::{BoardStats, ColumnPreference};
use crate::types::{Column, ColumnId};

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "#")]
    position: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Column")]
    title: String,
    #[tabled(rename = "Tasks")]
    tasks: usize,
    #[tabled(rename = "Shown")]
    shown: usize,
    #[tabled(rename = "State")]
    state: String,
}

fn state_label(hidden: bool, collapsed: bool) -> String {
    match (hidden, collapsed) {
        (true, true) => "hidden, collapsed",
        (true, false) => "hidden",
        (false, true) => "collapsed",
        (false, false) => "",
    }
    .to_string()
}

pub fn render_columns(
    columns: &[Column],
    preferences: &BTreeMap<ColumnId, ColumnPreference>,
) -> String {
    let rows = columns.iter().map(|column| {
        let pref = preferences.get(&column.id).copied().unwrap_or_default();
        ColumnRow {
            position: column.position,
            id: column.id.to_string(),
            title: column.title.clone(),
            state: state_label(pref.hidden, pref.collapsed),
        }
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn render_stats(stats: &BoardStats, styler: &Styler) -> String {
    let summary = format!(
        "{} of {} tasks shown across {} of {} columns",
        stats.visible_tasks, stats.total_tasks, stats.rendered_columns, stats.total_columns
    );
    let rows = stats.columns.iter().map(|column| StatsRow {
        title: column.title.clone(),
        tasks: column.task_count,
        shown: column.visible_count,
        state: state_label(column.hidden, column.collapsed),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());

    let mut output = styler.bold(&summary);
    if stats.filter_active {
        output.push_str(&styler.dimmed(" (filtered)"));
    }
    output.push('\n');
    output.push_str(&table.to_string());
    output
}
