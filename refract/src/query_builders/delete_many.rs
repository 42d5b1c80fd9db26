use sea_orm::{ConnectionTrait, DeleteMany, EntityTrait, QueryFilter};

use super::many::log_statement;
use crate::{Fragment, RefractResult};

/// Bulk DELETE of every row of `E` matching the filter.
pub struct DeleteManyQuery<'a, C: ConnectionTrait, E: EntityTrait> {
    delete: DeleteMany<E>,
    conn: &'a C,
}

impl<'a, C, E> DeleteManyQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            delete: E::delete_many(),
            conn,
        }
    }

    pub fn filter(mut self, fragment: impl Into<Fragment>) -> Self {
        if let Some(condition) = fragment.into().into_inner() {
            self.delete = self.delete.filter(condition);
        }
        self
    }

    /// Delete all matching records and return the number of rows affected
    pub async fn execute(self) -> RefractResult<u64> {
        log_statement(self.conn, &self.delete);
        let result = self.delete.exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}
