use async_trait::async_trait;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rocket::fairing::{Fairing, Info};
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

use crate::config::app_config::AppConfig;
use crate::database::{Database, ProductionDatabase};
use crate::hasher::{ProductionHasher, ProductionHasherConfig};
use crate::rng::SyncRng;
use crate::routes::{AuthRocketBuildExt, WebRocketBuildExt};
use crate::storage::NoteStorage;

/// Builds every collaborator from the app config on ignite and wires the
/// routes; the daemon and the integration tests attach this to an otherwise
/// bare rocket.
pub struct AppSetupFairing;

impl AppSetupFairing {
    pub fn new() -> Self {
        AppSetupFairing
    }
}

impl Default for AppSetupFairing {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! ok_or_bail {
    ($rocket:ident, $expr:expr, |$e:ident| $error_logger:expr) => ({
        match $expr {
            std::result::Result::Ok(ok) => ok,
            std::result::Result::Err(e) => {
                let $e = e;
                $error_logger;
                return std::result::Result::Err($rocket);
            },
        }
    });
}

#[async_trait]
impl Fairing for AppSetupFairing {
    fn info(&self) -> Info {
        use rocket::fairing::Kind;
        Info {
            name: "app setup",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(
        &self,
        rocket: Rocket<Build>,
    ) -> rocket::fairing::Result {
        let config: AppConfig = ok_or_bail!(
            rocket,
            rocket.figment().extract(),
            |e| {
                for e in e {
                    error!("{e}");
                }
                info!("finishing due to a config parse error");
            }
        );

        let argon2_params = ok_or_bail!(
            rocket,
            config.hasher.clone().try_into(),
            |e| error!("hasher config is invalid: {e}")
        );
        let hasher = ProductionHasher::new(
            ProductionHasherConfig::new(argon2_params),
            SyncRng::new(StdRng::from_entropy()),
        );

        let database: Box<dyn Database> = Box::new(
            ok_or_bail!(
                rocket,
                ProductionDatabase::new(&config, hasher).await,
                |e| error!("database initialization failed: {e}")
            )
        );

        let storage: NoteStorage = ok_or_bail!(
            rocket,
            NoteStorage::new(&config).await,
            |e| error!("note storage initialization failed: {e}")
        );

        Ok(
            rocket
                .manage(database)
                .manage(storage)
                .manage(config)
                .attach(Template::fairing())
                .install_notemark_web()
                .install_notemark_auth()
        )
    }
}
