mod cli;

use clap::Parser;
use log::{error, info, warn};
use notemark::config::app_config::AppConfig;
use notemark::config::figment::FigmentExt;
use notemark::error_exit;
use notemark::hasher::{Hasher, ProductionHasher, ProductionHasherConfig};
use notemark::rng::{make_uuid, SyncRng};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rocket::figment::Figment;
use rpassword::prompt_password;
use std::process::exit;

use crate::cli::CliConfig;

/// Prints a `[[user]]` record ready to paste into the database file.
fn main() {
    env_logger::init();

    let cli_config = CliConfig::parse();

    if !cli_config.config_file.exists() {
        error_exit!(
            "configuration file at {} does not exist",
            cli_config.config_file.display()
        )
    }

    let app_config: AppConfig = Figment::new()
        .setup_app_config(&cli_config.config_file)
        .extract()
        .unwrap_or_else(|e| {
            for e in e {
                error!("{e}");
            }
            info!("finishing due to a configuration error");
            exit(1)
        });

    let argon2_params = app_config.hasher.try_into()
        .unwrap_or_else(|e| error_exit!("hasher config is invalid: {}", e));
    let hasher = ProductionHasher::new(
        ProductionHasherConfig::new(argon2_params),
        SyncRng::new(StdRng::from_entropy()),
    );

    let read_value = prompt_password("Enter the password: ")
        .unwrap_or_else(|e| error_exit!("could not read password: {}", e));
    if read_value.is_empty() {
        error_exit!("entered password is empty")
    }

    if !cli_config.no_repeat {
        let confirmation_value = prompt_password("Repeat the password: ")
            .unwrap_or_else(|e| error_exit!("could not read password: {}", e));
        if confirmation_value != read_value {
            error_exit!("the passwords do not match")
        }
    }

    if read_value.trim() != read_value {
        warn!("the password has leading or trailing whitespace characters");
    }

    let hash = hasher.generate_hash(&read_value)
        .unwrap_or_else(|e| error_exit!("could not generate hash: {}", e));

    println!("[[user]]");
    println!("id = \"{}\"", make_uuid(&mut rand::thread_rng()));
    println!("username = \"{}\"", cli_config.username);
    println!("hash = \"{}\"", hash);
}
