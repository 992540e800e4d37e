use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::{error, info};
use time::OffsetDateTime;
use tokio::fs;
use uuid::Uuid;

use crate::database::internal::data::DatabaseData;
use crate::database::DatabaseError;
use crate::rng::make_uuid;

#[async_trait]
pub(super) trait DatabaseIo: Send + Sync {
    async fn read_database_file(&self) -> Result<DatabaseData, DatabaseError>;

    async fn write_database_file(
        &self,
        data: DatabaseData,
    ) -> Result<(), DatabaseError>;

    fn generate_uuid(&self) -> Uuid;

    fn now(&self) -> OffsetDateTime;
}

pub struct ProductionDatabaseIo {
    path: PathBuf,
}

impl ProductionDatabaseIo {
    pub fn new(path: PathBuf) -> Self {
        ProductionDatabaseIo { path }
    }
}

#[async_trait]
impl DatabaseIo for ProductionDatabaseIo {
    async fn read_database_file(&self) -> Result<DatabaseData, DatabaseError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "database file {} does not exist yet, starting empty",
                    self.path.display(),
                );
                Ok(DatabaseData::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn write_database_file(
        &self,
        data: DatabaseData,
    ) -> Result<(), DatabaseError> {
        let serialized = toml::to_string_pretty(&data)?;
        let tmp = self.path.with_extension(
            format!("tmp.{}", make_uuid(&mut rand::thread_rng())),
        );
        fs::write(&tmp, serialized).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                error!(
                    "failed to remove stale database tmp file {}: {cleanup}",
                    tmp.display(),
                );
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn generate_uuid(&self) -> Uuid {
        make_uuid(&mut rand::thread_rng())
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
