pub mod auth;
pub mod web;

pub use auth::AuthRocketBuildExt;
pub use web::WebRocketBuildExt;

use rocket::request::FlashMessage;

/// Flattens the one-shot flash message into the (kind, message) pair the
/// templates show.
pub(crate) fn flash_parts(
    flash: &Option<FlashMessage<'_>>,
) -> Option<(String, String)> {
    flash
        .as_ref()
        .map(|f| (f.kind().to_owned(), f.message().to_owned()))
}
