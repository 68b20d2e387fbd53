//! `pageline extract` - extraction stage only

use std::process::ExitCode;

use anyhow::Result;
use pageline_core::{ProgressContext, Stage};
use pageline_extract::Extractor;

use crate::config::Config;

pub fn run(config: Config, progress: &ProgressContext) -> Result<ExitCode> {
    let mut extractor =
        Extractor::new(config.extract_config()).with_progress(progress.stage_line("extract"));

    match extractor.run() {
        Ok(output) => {
            progress.println(format!("Extracted {output}"));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            log::error!("Extraction failed: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}
