use std::sync::Arc;

use log::info;
use sea_orm::{Database, DatabaseConnection, EntityTrait};

use crate::config::FactoryConfig;
use crate::query_builders::{DeleteManyQuery, SelectQuery, UpdateManyQuery};
use crate::RefractResult;

/// Entry point for building queries against one database.
///
/// Cheap to clone; clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct QueryFactory {
    db: Arc<DatabaseConnection>,
}

impl QueryFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    pub async fn connect(config: &FactoryConfig) -> RefractResult<Self> {
        info!(
            "connecting to {} (max_connections={})",
            redact(&config.database_url),
            config.max_connections
        );
        let db = Database::connect(config.connect_options()).await?;
        Ok(Self::new(db))
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// `SELECT * FROM E`
    pub fn select_from<E: EntityTrait>(&self) -> SelectQuery<'_, DatabaseConnection, E> {
        SelectQuery::new(self.db())
    }

    /// `UPDATE E SET ...`
    pub fn update<E: EntityTrait>(&self) -> UpdateManyQuery<'_, DatabaseConnection, E> {
        UpdateManyQuery::new(self.db())
    }

    /// `DELETE FROM E`
    pub fn delete<E: EntityTrait>(&self) -> DeleteManyQuery<'_, DatabaseConnection, E> {
        DeleteManyQuery::new(self.db())
    }
}

// Strip credentials from a connection URL before logging it.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
