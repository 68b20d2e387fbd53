//! `pageline run` - extract then transform

use std::process::ExitCode;

use anyhow::Result;
use pageline_core::{Pipeline, ProgressContext, RunSummary, fmt_num};
use pageline_extract::Extractor;
use pageline_transform::Transformer;

use super::styled_table;
use crate::config::Config;

pub fn run(config: Config, progress: &ProgressContext) -> Result<ExitCode> {
    let extractor =
        Extractor::new(config.extract_config()).with_progress(progress.stage_line("extract"));
    let transformer = Transformer::new(config.transform_config());

    let Some(summary) = Pipeline::new(extractor, transformer).run() else {
        return Ok(ExitCode::FAILURE);
    };

    print_summary(&summary, progress);
    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &RunSummary, progress: &ProgressContext) {
    let mut table = styled_table(&["Stage", "Rows", "Time", "Path"]);

    table.add_row(vec![
        "extract".to_string(),
        fmt_num(summary.raw.rows),
        format!("{:.2}s", summary.extract_elapsed.as_secs_f64()),
        summary.raw.path.display().to_string(),
    ]);
    table.add_row(vec![
        "transform".to_string(),
        fmt_num(summary.transformed.rows),
        format!("{:.2}s", summary.transform_elapsed.as_secs_f64()),
        summary.transformed.path.display().to_string(),
    ]);
    table.add_row(vec![
        "total".to_string(),
        String::new(),
        format!("{:.2}s", summary.total_elapsed.as_secs_f64()),
        String::new(),
    ]);

    progress.println(format!("\n{table}"));
}
