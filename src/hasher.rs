use std::ops::DerefMut;

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use log::warn;
use rand::rngs::StdRng;

use crate::rng::SyncRng;

pub trait Hasher: Send + Sync {
    fn generate_hash(&self, password: &str) -> Result<String, argon2::password_hash::Error>;
    fn check_hash(&self, hash: &str, password: &str) -> bool;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProductionHasherConfig {
    pub argon2_params: argon2::Params,
}

impl ProductionHasherConfig {
    pub fn new(argon2_params: argon2::Params) -> Self {
        ProductionHasherConfig {
            argon2_params,
        }
    }
}

pub struct ProductionHasher {
    config: ProductionHasherConfig,
    rng: SyncRng<StdRng>,
}

impl ProductionHasher {
    pub fn new(
        config: ProductionHasherConfig,
        rng: SyncRng<StdRng>,
    ) -> Self {
        ProductionHasher {
            config,
            rng,
        }
    }

    fn get_hasher(&self) -> Argon2<'_> {
        Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            self.config.argon2_params.clone(),
        )
    }

    fn make_salt(&self) -> SaltString {
        SaltString::generate(self.rng.get_rng().deref_mut())
    }
}

impl Hasher for ProductionHasher {
    fn generate_hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = self.make_salt();
        let hasher = self.get_hasher();
        Ok(
            hasher.hash_password(password.as_bytes(), &salt)?
                .serialize()
                .to_string()
        )
    }

    fn check_hash(&self, hash: &str, password: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("stored password hash is malformed: {e}");
                return false;
            },
        };
        self.get_hasher()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
