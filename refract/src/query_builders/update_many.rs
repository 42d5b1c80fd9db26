use log::debug;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, UpdateMany, Value};

use super::many::log_statement;
use crate::{Field, Fragment, RefractResult};

/// Bulk UPDATE of every row of `E` matching the filter; returns rows affected.
///
/// Runs a single statement against the database. An absent filter updates
/// every row.
pub struct UpdateManyQuery<'a, C: ConnectionTrait, E: EntityTrait> {
    update: UpdateMany<E>,
    assignments: usize,
    conn: &'a C,
}

impl<'a, C, E> UpdateManyQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            update: E::update_many(),
            assignments: 0,
            conn,
        }
    }

    /// `SET field = value`
    pub fn set<T: Into<Value>>(self, field: Field<E, T>, value: impl Into<T>) -> Self {
        let value: T = value.into();
        self.set_expr(field, SimpleExpr::Value(value.into()))
    }

    /// `SET field = expr`, e.g. `age = age * 2`.
    pub fn set_expr<T>(mut self, field: Field<E, T>, expr: impl Into<SimpleExpr>) -> Self {
        self.update = self.update.col_expr(field.column(), expr.into());
        self.assignments += 1;
        self
    }

    pub fn filter(mut self, fragment: impl Into<Fragment>) -> Self {
        if let Some(condition) = fragment.into().into_inner() {
            self.update = self.update.filter(condition);
        }
        self
    }

    pub async fn execute(self) -> RefractResult<u64> {
        if self.assignments == 0 {
            debug!("update on '{}' has no assignments, skipping", E::default().table_name());
            return Ok(0);
        }
        log_statement(self.conn, &self.update);
        let result = self.update.exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}
