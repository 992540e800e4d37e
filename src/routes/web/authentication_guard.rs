use async_trait::async_trait;
use log::warn;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use uuid::Uuid;

use crate::lib_constants::USER_ID_COOKIE;

/// The request-scoped principal, decoded from the private session cookie.
/// Routes taking this guard never run for unauthenticated requests; the 401
/// they produce is caught and turned into a redirect to the login page.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    id: Uuid,
}

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let cookie = match request.cookies().get_private(USER_ID_COOKIE) {
            Some(cookie) => cookie,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };
        match Uuid::parse_str(cookie.value()) {
            Ok(id) => Outcome::Success(CurrentUser { id }),
            Err(_) => {
                warn!("session cookie does not hold a user id");
                Outcome::Error((Status::Unauthorized, ()))
            },
        }
    }
}
