//! `pageline transform` - flatten an existing raw sink

use std::process::ExitCode;

use anyhow::Result;
use pageline_core::Stage;
use pageline_transform::Transformer;

use crate::config::Config;

pub fn run(config: Config) -> Result<ExitCode> {
    let mut transformer = Transformer::new(config.transform_config());

    match transformer.run() {
        Ok(output) if output.is_empty() => Ok(ExitCode::FAILURE),
        Ok(output) => {
            log::info!("Transformed {output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            log::error!("Transformation failed: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}
