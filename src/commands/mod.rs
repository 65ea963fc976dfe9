pub mod deps;
pub mod generate;
pub mod validate;

use std::path::PathBuf;

use serde::Serialize;

use kmpgen::config::{resolve_config, ConfigOverrides};
use kmpgen::error::Result;
use kmpgen::Generator;

/// Global options shared by every command.
pub struct Context {
    pub template_root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    pub fn generator(&self) -> Result<Generator> {
        let config = resolve_config(ConfigOverrides {
            config_file: self.config.clone(),
            template_root: self.template_root.clone(),
        })?;
        Ok(Generator::from_config(config))
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("failed to serialize report: {e}"),
    }
}
