//! tm theme command: the persisted dark/light preference.
//!
//! The preference lives in its own storage slot with its own lifecycle;
//! the task engine never depends on it.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ThemeOptions {
    pub mode: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ThemeOutput {
    dark_mode: bool,
}

pub fn run(options: ThemeOptions) -> Result<()> {
    let ctx = super::task::load_context(options.data_dir, options.config)?;
    let storage = ctx.store.storage();

    let dark_mode = match options.mode.as_deref() {
        None => storage.load_dark_mode(),
        Some(mode) => {
            let dark = match mode.trim().to_lowercase().as_str() {
                "dark" => true,
                "light" => false,
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "invalid theme mode '{}': must be dark or light",
                        mode
                    )));
                }
            };
            storage.save_dark_mode(dark)?;
            dark
        }
    };

    let mut human = HumanOutput::new("Theme");
    human.push_summary("Mode", if dark_mode { "dark" } else { "light" });

    let output = ThemeOutput { dark_mode };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "theme",
        &output,
        Some(&human),
    )
}
