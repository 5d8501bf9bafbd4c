// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::Result;
use cli::args::{Args, Command};
use cli::handlers::{self, Workbench};
use infrastructure::Config;
use tracing::debug;

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting tagsmith with arguments");

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)?;
    config.apply_env_overrides();
    let bench = Workbench::new(config, config_path, args.workspace)?;

    match args.command {
        Command::Generate { text, file } => handlers::generate(&bench, text, file.as_deref()),
        Command::Tags { json } => handlers::show_tags(&bench, json),
        Command::Tag(command) => handlers::tag(&bench, command),
        Command::Link(command) => handlers::link(&bench, command),
        Command::Export {
            format,
            selected,
            stdout,
        } => handlers::export(&bench, format, selected, stdout),
        Command::Auth(command) => handlers::auth(&bench, command),
        Command::Usage => handlers::usage(&bench),
        Command::Admin(command) => handlers::admin(&bench, command),
        Command::Health => handlers::health(&bench),
        Command::Config(command) => handlers::config(&bench, command),
    }
}

#[cfg(test)]
/// must be public to be used from integration tests
mod tests {
    use crate::util::testing;
    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }
}
