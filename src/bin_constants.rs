pub const DEFAULT_CONFIG_FILE: &str = "/etc/notemark/notemark.toml";
pub const APP_CONFIG_ENV_PREFIX: &str = "NOTEMARK_";
