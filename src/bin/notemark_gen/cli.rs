use std::path::PathBuf;

use clap::Parser;
use notemark::bin_constants::DEFAULT_CONFIG_FILE;

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(version, author, about)]
pub struct CliConfig {
    /// Username to emit in the generated record.
    pub username: String,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    #[arg(long, short = 'y', default_value_t = false)]
    pub no_repeat: bool,
}
