use log::{debug, log_enabled, Level};
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ConnectionTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, RelationDef, Select,
};

use super::projection::{Projection, ProjectionQuery};
use crate::field::OrderSpec;
use crate::{Field, Fragment, QueryError, RefractResult};

/// Query builder selecting rows of `E` that satisfy a composed filter.
pub struct SelectQuery<'a, C: ConnectionTrait, E: EntityTrait> {
    select: Select<E>,
    limit: Option<u64>,
    conn: &'a C,
}

impl<'a, C, E> SelectQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            select: E::find(),
            limit: None,
            conn,
        }
    }

    /// AND `fragment` into the WHERE clause. Absent fragments are ignored.
    pub fn filter(mut self, fragment: impl Into<Fragment>) -> Self {
        if let Some(condition) = fragment.into().into_inner() {
            self.select = self.select.filter(condition);
        }
        self
    }

    pub fn order_by(mut self, spec: OrderSpec) -> Self {
        self.select = match spec.nulls {
            Some(nulls) => self.select.order_by_with_nulls(spec.expr, spec.order, nulls),
            None => self.select.order_by(spec.expr, spec.order),
        };
        self
    }

    /// Limit the number of results
    pub fn take(mut self, limit: u64) -> Self {
        self.select = self.select.limit(limit);
        self.limit = Some(limit);
        self
    }

    /// Skip a number of results (for pagination)
    pub fn skip(mut self, offset: u64) -> Self {
        self.select = self.select.offset(offset);
        self
    }

    pub fn join(mut self, join_type: JoinType, relation: RelationDef) -> Self {
        self.select = self.select.join(join_type, relation);
        self
    }

    /// Join with an additional ON condition (`LEFT JOIN team ON ... AND team.name = 'teamA'`).
    pub fn join_on(
        mut self,
        join_type: JoinType,
        relation: RelationDef,
        on: impl Into<Fragment>,
    ) -> Self {
        let relation = match on.into().into_inner() {
            Some(condition) => relation.on_condition(move |_, _| condition.clone()),
            None => relation,
        };
        self.select = self.select.join(join_type, relation);
        self
    }

    pub fn group_by<F: EntityTrait, T>(mut self, field: Field<F, T>) -> Self {
        self.select = self.select.group_by(field.as_simple_expr());
        self
    }

    pub fn having(mut self, fragment: impl Into<Fragment>) -> Self {
        if let Some(condition) = fragment.into().into_inner() {
            self.select = self.select.having(condition);
        }
        self
    }

    /// Replace the selected columns with `projection`.
    pub fn project(self, projection: Projection) -> ProjectionQuery<'a, C, E> {
        ProjectionQuery::new(projection.apply(self.select), self.conn)
    }

    /// Select a single expression per row.
    pub fn select_expr(self, expr: impl Into<SimpleExpr>, alias: &str) -> ProjectionQuery<'a, C, E> {
        self.project(Projection::new().expr_as(expr, alias))
    }

    /// Underlying SeaORM select, for anything this builder does not cover.
    pub fn into_select(self) -> Select<E> {
        self.select
    }

    /// Execute the query and return all rows.
    pub async fn fetch(self) -> RefractResult<Vec<E::Model>> {
        log_statement(self.conn, &self.select);
        Ok(self.select.all(self.conn).await?)
    }

    /// First row, if any.
    pub async fn fetch_first(self) -> RefractResult<Option<E::Model>> {
        log_statement(self.conn, &self.select);
        Ok(self.select.one(self.conn).await?)
    }

    /// The single matching row, `None` when nothing matches.
    ///
    /// Fails with [`QueryError::NonUniqueResult`] if more than one row matches.
    /// A `take` of 0 or 1 is kept, so at most that many rows can come back.
    pub async fn fetch_one(self) -> RefractResult<Option<E::Model>> {
        let limit = self.limit.map_or(2, |limit| limit.min(2));
        let select = self.select.limit(limit);
        log_statement(self.conn, &select);
        let mut rows = select.all(self.conn).await?;
        if rows.len() > 1 {
            return Err(QueryError::non_unique_result(E::default().table_name()));
        }
        Ok(rows.pop())
    }

    pub async fn fetch_count(self) -> RefractResult<u64>
    where
        E::Model: Sync,
    {
        log_statement(self.conn, &self.select);
        Ok(self.select.count(self.conn).await?)
    }

    /// Rows of `E` paired with the row of `F` brought in by a join.
    pub async fn fetch_pairs<F: EntityTrait>(
        self,
        related: F,
    ) -> RefractResult<Vec<(E::Model, Option<F::Model>)>> {
        let select = self.select.select_also(related);
        log_statement(self.conn, &select);
        Ok(select.all(self.conn).await?)
    }
}

pub(crate) fn log_statement<C: ConnectionTrait, Q: QueryTrait>(conn: &C, query: &Q) {
    if log_enabled!(Level::Debug) {
        let statement = query.build(conn.get_database_backend());
        debug!("executing: {}", statement);
    }
}
