use super::{BoardContext, CommandOutput};
use crate::config::Config;
use crate::display::{Styler, render_stats};
use crate::error::Result;

pub async fn cmd_stats(config: &Config, project: Option<&str>, output_json: bool) -> Result<()> {
    let ctx = BoardContext::open_interactive(config, project).await?;
    let stats = ctx.controller.get_board_stats();
    CommandOutput::new(serde_json::to_value(&stats)?)
        .with_text(render_stats(&stats, &Styler::for_stdout()))
        .print(output_json)
}
