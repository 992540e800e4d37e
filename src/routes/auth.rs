use log::info;
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{catch, catchers, get, post, routes, uri, Build, Rocket, State};
use rocket_dyn_templates::{context, Template};

use crate::database::Database;
use crate::lib_constants::USER_ID_COOKIE;
use crate::routes::flash_parts;
use crate::routes::web::forms::LoginForm;
use crate::routes::web::{CurrentUser, PageError};

#[get("/auth/login")]
pub(crate) fn login_page(
    user: Option<CurrentUser>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Redirect> {
    if user.is_some() {
        return Err(Redirect::to(uri!(crate::routes::web::index)));
    }
    Ok(
        Template::render(
            "login",
            context! {
                flash: flash_parts(&flash),
            },
        )
    )
}

#[post("/auth/login", data = "<form>")]
pub(crate) async fn login(
    db: &State<Box<dyn Database>>,
    cookies: &CookieJar<'_>,
    form: Option<Form<LoginForm<'_>>>,
) -> Result<Flash<Redirect>, PageError> {
    let Some(form) = form else {
        return Ok(
            Flash::error(
                Redirect::to(uri!(login_page)),
                "required fields missing",
            )
        );
    };
    match db.check_user_credentials(form.username, form.password).await? {
        Some(user) => {
            cookies.add_private(
                Cookie::new(USER_ID_COOKIE, user.id.to_string()),
            );
            info!("user \"{}\" logged in", user.username);
            Ok(
                Flash::success(
                    Redirect::to(uri!(crate::routes::web::index)),
                    "logged in",
                )
            )
        },
        None => Ok(
            Flash::error(
                Redirect::to(uri!(login_page)),
                "invalid username or password",
            )
        ),
    }
}

#[get("/auth/logout")]
pub(crate) fn logout(
    _user: CurrentUser,
    cookies: &CookieJar<'_>,
) -> Flash<Redirect> {
    cookies.remove_private(Cookie::from(USER_ID_COOKIE));
    Flash::success(Redirect::to(uri!(login_page)), "logged out")
}

#[catch(401)]
pub(crate) fn unauthorized() -> Redirect {
    Redirect::to(uri!(login_page))
}

pub trait AuthRocketBuildExt {
    fn install_notemark_auth(self) -> Self;
}

impl AuthRocketBuildExt for Rocket<Build> {
    fn install_notemark_auth(self) -> Self {
        self
            .mount(
                "/",
                routes![
                    login_page,
                    login,
                    logout,
                ]
            )
            .register("/", catchers![unauthorized])
    }
}
