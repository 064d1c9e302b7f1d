mod fit;
mod prepare;
mod validate;

use std::path::PathBuf;

pub enum Command {
    Prepare {
        config: PathBuf,
        out: Option<PathBuf>,
        fill: Option<String>,
    },
    Fit {
        config: PathBuf,
        out: Option<PathBuf>,
        lag: Option<usize>,
        lead: Option<usize>,
    },
    Validate {
        config: PathBuf,
    },
}

pub fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Prepare { config, out, fill } => prepare::run(config, out, fill),
        Command::Fit {
            config,
            out,
            lag,
            lead,
        } => fit::run(config, out, lag, lead),
        Command::Validate { config } => validate::run(config),
    }
}
