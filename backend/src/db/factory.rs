//! Builds the store object the server runs on.
//!
//! The backend comes either from the environment or from a
//! `repository.toml` file (see [`RepositoryConfig`]). Both paths reject an
//! unknown backend name instead of guessing.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::{PostgresConfig, PostgresRepository};
use super::repository::{RepositoryError, RepositoryResult, TodoRepository};

/// Which backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = RepositoryError;

    /// Accepts `postgres`, `pg` and `local`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(RepositoryError::configuration(format!(
                "Unknown repository type: {:?} (expected \"local\" or \"postgres\")",
                s
            ))),
        }
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` when set; otherwise Postgres if `DATABASE_URL` or
    /// `PG_DATABASE_URL` is present, else Local.
    pub fn from_env() -> RepositoryResult<Self> {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(value) => value.parse(),
            Err(_) => {
                let has_url = std::env::var_os("DATABASE_URL").is_some()
                    || std::env::var_os("PG_DATABASE_URL").is_some();
                Ok(if has_url { Self::Postgres } else { Self::Local })
            }
        }
    }
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration(
        "Postgres repository requested but the `postgres-repo` feature is not enabled",
    )
}

/// Entry points for building a [`TodoRepository`].
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// In-memory repository.
    pub fn create_local() -> Arc<dyn TodoRepository> {
        log::info!("using local in-memory repository");
        Arc::new(LocalRepository::new())
    }

    /// Postgres repository. Opening the pool blocks, so it runs off the
    /// async workers.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(config: PostgresConfig) -> RepositoryResult<Arc<dyn TodoRepository>> {
        let max_pool_size = config.max_pool_size;
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("pool setup task failed: {}", e)))??;
        log::info!("using postgres repository (max_pool_size={})", max_pool_size);
        Ok(Arc::new(repo))
    }

    /// Build the backend named by the environment.
    pub async fn from_env() -> RepositoryResult<Arc<dyn TodoRepository>> {
        match RepositoryType::from_env()? {
            RepositoryType::Local => Ok(Self::create_local()),
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => {
                let config = PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create_postgres(config).await
            }
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => Err(postgres_disabled()),
        }
    }

    /// Build the backend described by a TOML file.
    pub async fn from_config_file<P: AsRef<Path>>(
        path: P,
    ) -> RepositoryResult<Arc<dyn TodoRepository>> {
        Self::from_config(&RepositoryConfig::from_file(path)?).await
    }

    pub async fn from_config(config: &RepositoryConfig) -> RepositoryResult<Arc<dyn TodoRepository>> {
        match config.repository_type()? {
            RepositoryType::Local => Ok(Self::create_local()),
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => Self::create_postgres(config.postgres_config()?).await,
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => Err(postgres_disabled()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_names() {
        assert_eq!("local".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        assert_eq!(" Pg ".parse::<RepositoryType>().unwrap(), RepositoryType::Postgres);
        assert!(matches!(
            "sqlite".parse::<RepositoryType>(),
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_local_from_config() {
        let config: RepositoryConfig = "[repository]\ntype = \"local\"\n".parse().unwrap();
        let repo = RepositoryFactory::from_config(&config).await.unwrap();
        assert!(repo.health_check().await.unwrap());
    }

    #[cfg(not(feature = "postgres-repo"))]
    #[tokio::test]
    async fn test_postgres_requires_feature() {
        let config: RepositoryConfig = "[repository]\ntype = \"postgres\"\n".parse().unwrap();
        assert!(matches!(
            RepositoryFactory::from_config(&config).await,
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }
}
