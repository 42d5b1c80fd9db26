use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, QuerySelect, Select, TryGetableMany,
};

use super::many::log_statement;
use crate::{Field, RefractResult};

/// The column list of a projection query, in select-clause order.
///
/// Aliases are what a [`FromQueryResult`] target reads by name; tuple targets
/// read by position.
#[derive(Clone, Debug, Default)]
pub struct Projection {
    columns: Vec<(SimpleExpr, String)>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `field` under its own column name.
    pub fn field<E: EntityTrait, T>(self, field: Field<E, T>) -> Self {
        let alias = field.name().to_string();
        self.expr_as(field.as_simple_expr(), alias)
    }

    /// Select `field` under a different name (`username AS name`).
    pub fn field_as<E: EntityTrait, T>(self, field: Field<E, T>, alias: impl Into<String>) -> Self {
        self.expr_as(field.as_simple_expr(), alias)
    }

    pub fn expr_as(mut self, expr: impl Into<SimpleExpr>, alias: impl Into<String>) -> Self {
        self.columns.push((expr.into(), alias.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn apply<E: EntityTrait>(self, select: Select<E>) -> Select<E> {
        self.columns
            .into_iter()
            .fold(select.select_only(), |select, (expr, alias)| {
                select.column_as(expr, alias)
            })
    }
}

/// A select whose rows are mapped into a DTO or a tuple rather than `E::Model`.
pub struct ProjectionQuery<'a, C: ConnectionTrait, E: EntityTrait> {
    select: Select<E>,
    conn: &'a C,
}

impl<'a, C, E> ProjectionQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    pub(crate) fn new(select: Select<E>, conn: &'a C) -> Self {
        Self { select, conn }
    }

    /// Map each row into `M` by column alias.
    pub async fn fetch<M>(self) -> RefractResult<Vec<M>>
    where
        M: FromQueryResult + Sized + Send + Sync,
    {
        log_statement(self.conn, &self.select);
        Ok(self.select.into_model::<M>().all(self.conn).await?)
    }

    /// Map each row into a value or tuple by column position.
    pub async fn fetch_tuple<T>(self) -> RefractResult<Vec<T>>
    where
        T: TryGetableMany,
    {
        log_statement(self.conn, &self.select);
        Ok(self.select.into_tuple::<T>().all(self.conn).await?)
    }

    pub fn into_select(self) -> Select<E> {
        self.select
    }
}
