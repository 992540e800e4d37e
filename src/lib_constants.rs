pub const DEFAULT_DATA_DIR: &str = "/var/notemark";

/// Limit on the stored Markdown source of a single note.
pub const DEFAULT_MAX_NOTE_SIZE: u64 = 512 * 1024;

// Rendered HTML is larger than its Markdown source; reads of the rendered
// file are limited to this multiple of the configured note size.
pub const RENDERED_NOTE_SIZE_FACTOR: u64 = 4;

pub const DATABASE_FILE: &str = "database.toml";
pub const NOTEBOOKS_DIR: &str = "notebooks";

pub const NOTE_MD_EXT: &str = "md";
pub const NOTE_HTML_EXT: &str = "html";

// the defaults are taken from the argon2 crate itself
pub const DEFAULT_ARGON2_M_COST: u32 = 19 * 1024;
pub const DEFAULT_ARGON2_T_COST: u32 = 2;
pub const DEFAULT_ARGON2_P_COST: u32 = 1;
pub const DEFAULT_ARGON2_OUTPUT_LEN: Option<usize> = Some(32);

pub const USER_ID_COOKIE: &str = "user_id";
