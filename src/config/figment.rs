use std::path::Path;

use rocket::data::ToByteUnit;
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::Figment;

use crate::bin_constants::APP_CONFIG_ENV_PREFIX;
use crate::config::app_config::AppConfig;

pub trait FigmentExt {
    fn setup_app_config(
        self,
        config_file: impl AsRef<Path>,
    ) -> Figment;
}

impl FigmentExt for Figment {
    fn setup_app_config(self, config_file: impl AsRef<Path>) -> Figment {
        self.merge(Serialized::defaults(AppConfig::default()))
            // notes are posted through a regular html form, so the form
            // body limit must stay above max_note_size
            .merge(("limits.form", 1.mebibytes()))
            .merge(Toml::file_exact(config_file))
            .merge(Env::prefixed(APP_CONFIG_ENV_PREFIX).global())
    }
}
