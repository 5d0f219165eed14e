use owo_colors::AnsiColors;

use super::Styler;
use crate::board::{BoardView, CardView, ColumnView};

fn column_header(column: &ColumnView, query_active: bool, styler: &Styler) -> String {
    let count = if query_active {
        format!("{}/{}", column.match_count, column.task_count)
    } else {
        column.task_count.to_string()
    };
    let mut header = styler.bold(&format!("{} ({count})", column.title));
    if column.collapsed {
        header.push(' ');
        header.push_str(&styler.dimmed("[collapsed]"));
    }
    header
}

fn card_line(card: &CardView, styler: &Styler) -> String {
    let mut line = format!(
        "  {}  {}",
        styler.paint(card.task_id.as_str(), AnsiColors::Cyan),
        card.title
    );
    if !card.labels.is_empty() {
        let labels = format!(" [{}]", card.labels.join(", "));
        line.push_str(&styler.paint(&labels, AnsiColors::Magenta));
    }
    let (done, total) = card.checklist;
    if total > 0 {
        line.push_str(&format!(" ({done}/{total})"));
    }
    if card.is_pending {
        line.push_str(&styler.dimmed(" (saving)"));
    }
    line
}

/// Columns in order, one card per line
pub fn render_board(view: &BoardView, styler: &Styler) -> String {
    if view.columns.is_empty() {
        return styler.dimmed("No columns to show");
    }
    let query_active = !view.query.trim().is_empty();
    let blocks: Vec<String> = view
        .columns
        .iter()
        .map(|column| {
            let mut lines = vec![column_header(column, query_active, styler)];
            if !column.collapsed {
                if column.cards.is_empty() {
                    lines.push(styler.dimmed("  (empty)"));
                }
                lines.extend(column.cards.iter().map(|card| card_line(card, styler)));
            }
            lines.join("\n")
        })
        .collect();
    blocks.join("\n\n")
}
