use sea_orm::DbErr;

/// Errors raised by the query builders.
///
/// Composing fragments never fails; these only come out of executing a
/// query against the database.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("QueryError::NonUniqueResult: entity='{entity}' matched more than one row")]
    NonUniqueResult { entity: String },

    #[error("QueryError::InvalidConfiguration: key='{key}' message='{message}'")]
    InvalidConfiguration { key: String, message: String },

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl QueryError {
    pub fn non_unique_result(entity: impl Into<String>) -> Self {
        Self::NonUniqueResult {
            entity: entity.into(),
        }
    }

    pub fn invalid_configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Connection-level failures may succeed on retry; everything else is a
    /// problem with the query or the data.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Database(DbErr::Conn(_)) | Self::Database(DbErr::ConnectionAcquire(_))
        )
    }
}

impl From<QueryError> for DbErr {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Database(err) => err,
            other => DbErr::Custom(other.to_string()),
        }
    }
}

pub type RefractResult<T> = std::result::Result<T, QueryError>;
