use std::marker::PhantomData;

use sea_orm::sea_query::{
    Alias, DynIden, Expr, Func, IntoColumnRef, IntoIden, Query, SelectStatement, SimpleExpr,
    SubQueryStatement,
};
use sea_orm::{EntityTrait, Value};

use crate::{Field, Fragment};

/// An aliased copy of `E`'s table, used as the FROM of a correlated or
/// uncorrelated subquery (`FROM member AS member_sub`).
pub struct SubQuery<E: EntityTrait> {
    alias: DynIden,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> SubQuery<E> {
    pub fn of(alias: &str) -> Self {
        Self {
            alias: Alias::new(alias).into_iden(),
            _entity: PhantomData,
        }
    }

    /// Refer to `field` through this subquery's alias.
    pub fn field<T>(&self, field: Field<E, T>) -> AliasedField<T> {
        AliasedField {
            expr: Expr::col((self.alias.clone(), field.column()).into_column_ref()),
            _value: PhantomData,
        }
    }

    pub fn max<T>(&self, field: Field<E, T>) -> ScalarSubQuery {
        self.scalar(Func::max(self.column(field)).into())
    }

    pub fn min<T>(&self, field: Field<E, T>) -> ScalarSubQuery {
        self.scalar(Func::min(self.column(field)).into())
    }

    pub fn avg<T>(&self, field: Field<E, T>) -> ScalarSubQuery {
        self.scalar(Func::avg(self.column(field)).into())
    }

    pub fn count<T>(&self, field: Field<E, T>) -> ScalarSubQuery {
        self.scalar(Func::count(self.column(field)).into())
    }

    /// `SELECT alias.field FROM table AS alias WHERE filter`
    pub fn list<T>(&self, field: Field<E, T>, filter: impl Into<Fragment>) -> ListSubQuery<T> {
        let mut statement = self.from();
        statement.expr(self.column(field));
        if let Some(condition) = filter.into().into_inner() {
            statement.cond_where(condition);
        }
        ListSubQuery {
            statement,
            _value: PhantomData,
        }
    }

    fn column<T>(&self, field: Field<E, T>) -> SimpleExpr {
        SimpleExpr::Column((self.alias.clone(), field.column()).into_column_ref())
    }

    fn from(&self) -> SelectStatement {
        let mut statement = Query::select();
        statement.from_as(E::default(), self.alias.clone());
        statement
    }

    fn scalar(&self, aggregate: SimpleExpr) -> ScalarSubQuery {
        let mut statement = self.from();
        statement.expr(aggregate);
        ScalarSubQuery { statement }
    }
}

/// A field read through a subquery alias; builds fragments for the
/// subquery's own WHERE clause.
pub struct AliasedField<T> {
    expr: Expr,
    _value: PhantomData<fn() -> T>,
}

impl<T: Into<Value>> AliasedField<T> {
    fn value(value: impl Into<T>) -> SimpleExpr {
        SimpleExpr::Value(Into::<T>::into(value).into())
    }

    pub fn eq(&self, value: impl Into<T>) -> Fragment {
        self.expr.clone().eq(Self::value(value)).into()
    }

    pub fn gt(&self, value: impl Into<T>) -> Fragment {
        self.expr.clone().gt(Self::value(value)).into()
    }

    pub fn goe(&self, value: impl Into<T>) -> Fragment {
        self.expr.clone().gte(Self::value(value)).into()
    }

    pub fn lt(&self, value: impl Into<T>) -> Fragment {
        self.expr.clone().lt(Self::value(value)).into()
    }

    pub fn loe(&self, value: impl Into<T>) -> Fragment {
        self.expr.clone().lte(Self::value(value)).into()
    }

    /// Correlate with a column of the outer query.
    pub fn eq_outer<E: EntityTrait>(&self, outer: Field<E, T>) -> Fragment {
        self.expr.clone().equals(outer.column_ref()).into()
    }
}

/// A subquery yielding a single aggregate value.
///
/// Untyped: `avg` of an integer column compares against that column and the
/// database does the numeric promotion.
#[derive(Clone, Debug)]
pub struct ScalarSubQuery {
    statement: SelectStatement,
}

impl ScalarSubQuery {
    /// Restrict the rows the aggregate runs over.
    pub fn filter(mut self, filter: impl Into<Fragment>) -> Self {
        if let Some(condition) = filter.into().into_inner() {
            self.statement.cond_where(condition);
        }
        self
    }

    /// Use as an expression, e.g. in a projection.
    pub fn into_expr(self) -> SimpleExpr {
        SimpleExpr::SubQuery(
            None,
            Box::new(SubQueryStatement::SelectStatement(self.statement)),
        )
    }

    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }
}

/// A subquery yielding a column of `T` values, for `IN (...)`.
#[derive(Clone, Debug)]
pub struct ListSubQuery<T> {
    statement: SelectStatement,
    _value: PhantomData<fn() -> T>,
}

impl<T> ListSubQuery<T> {
    pub fn into_statement(self) -> SelectStatement {
        self.statement
    }
}
