use super::{BoardContext, CommandOutput};
use crate::config::Config;
use crate::display::{Styler, render_board};
use crate::error::Result;
use crate::types::ColumnId;

/// Render the board, optionally filtered by a query and a set of columns
pub async fn cmd_show(
    config: &Config,
    project: Option<&str>,
    search: Option<&str>,
    columns: &[String],
    output_json: bool,
) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    if let Some(query) = search {
        ctx.controller.set_search_query(query);
    }
    if !columns.is_empty() {
        let ids = columns
            .iter()
            .map(|key| ctx.resolve_column(key))
            .collect::<Result<Vec<ColumnId>>>()?;
        ctx.controller.set_column_filter(ids);
    }

    let view = ctx.controller.view();
    ctx.flush_toasts();
    CommandOutput::new(serde_json::to_value(&view)?)
        .with_text(render_board(&view, &Styler::for_stdout()))
        .print(output_json)
}
