pub mod extract;
pub mod run;
pub mod transform;

use std::path::PathBuf;

use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use pageline_core::ProgressContext;

use crate::config::Config;

/// Output overrides shared by every stage command
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Output format (csv, parquet)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Directory holding the raw sink and the transformed file
    #[arg(short = 'o', long)]
    pub data_dir: Option<PathBuf>,
}

impl OutputArgs {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(dir) = self.data_dir {
            config.output.data_dir = dir;
        }
        config
    }
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

fn mask(secret: Option<&str>) -> &'static str {
    if secret.is_some_and(|s| !s.is_empty()) {
        "configured"
    } else {
        "not set"
    }
}

pub fn show_config(config: &Config, progress: &ProgressContext) {
    let mut table = styled_table(&["Setting", "Value"]);
    let extract = config.extract_config();
    let transform = config.transform_config();

    table.add_row(vec!["Endpoint".to_string(), extract.endpoint()]);
    table.add_row(vec!["Page size".to_string(), config.api.page_size.to_string()]);
    table.add_row(vec![
        "Max retries".to_string(),
        config.api.max_retries.to_string(),
    ]);
    table.add_row(vec![
        "Retry backoff".to_string(),
        format!("{}ms * 2^k", config.api.retry_base_ms),
    ]);
    table.add_row(vec!["Timeout".to_string(), format!("{}s", config.api.timeout)]);
    table.add_row(vec!["Timestamp".to_string(), config.auth.ts.clone()]);
    table.add_row(vec![
        "Public key".to_string(),
        mask(config.auth.public_key.as_deref()).to_string(),
    ]);
    table.add_row(vec![
        "Private key".to_string(),
        mask(config.auth.private_key.as_deref()).to_string(),
    ]);
    table.add_row(vec![
        "Hash".to_string(),
        mask(config.auth.hash.as_deref()).to_string(),
    ]);
    table.add_row(vec![
        "Raw sink".to_string(),
        extract.raw_path.display().to_string(),
    ]);
    table.add_row(vec![
        "Output".to_string(),
        transform.output_path().display().to_string(),
    ]);
    table.add_row(vec![
        "Compression level".to_string(),
        config.output.compression_level.to_string(),
    ]);

    progress.println(format!("\n{table}"));
}
