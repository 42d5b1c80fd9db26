use std::fmt;
use std::marker::PhantomData;

use sea_orm::sea_query::{
    ColumnRef, Expr, Func, IntoColumnRef, NullOrdering, Order, SimpleExpr,
};
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, RelationDef, Value};

use crate::subquery::{ListSubQuery, ScalarSubQuery};
use crate::Fragment;

/// A typed column of entity `E` holding values of type `T`.
///
/// For a nullable column (`Option<T>` on the model) the descriptor is still
/// `Field<E, T>`; use [`Field::is_null`] to test for NULL. Predicates can only
/// be built from values convertible into `T`, so a mismatched field/value pair
/// does not compile.
pub struct Field<E: EntityTrait, T> {
    column: E::Column,
    _value: PhantomData<fn() -> T>,
}

impl<E: EntityTrait, T> Clone for Field<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: EntityTrait, T> Copy for Field<E, T> {}

impl<E: EntityTrait, T> fmt::Debug for Field<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("column", &self.column.as_str())
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<E: EntityTrait, T> Field<E, T> {
    pub const fn new(column: E::Column) -> Self {
        Self {
            column,
            _value: PhantomData,
        }
    }

    pub fn column(&self) -> E::Column {
        self.column
    }

    /// Column name as declared on the entity.
    pub fn name(&self) -> &str {
        self.column.as_str()
    }

    /// Table-qualified reference to this column.
    pub fn column_ref(&self) -> ColumnRef {
        (self.column.entity_name(), self.column).into_column_ref()
    }

    /// Expression handle for arithmetic and function calls (`age * 2`).
    pub fn expr(&self) -> Expr {
        Expr::col(self.column_ref())
    }

    pub fn as_simple_expr(&self) -> SimpleExpr {
        SimpleExpr::Column(self.column_ref())
    }

    pub fn is_null(&self) -> Fragment {
        self.column.is_null().into()
    }

    pub fn is_not_null(&self) -> Fragment {
        self.column.is_not_null().into()
    }

    /// Compare against another column carrying the same value type.
    pub fn eq_field<F: EntityTrait>(&self, other: Field<F, T>) -> Fragment {
        self.expr().equals(other.column_ref()).into()
    }

    /// Compare against an arbitrary expression (`username = lower(username)`).
    pub fn eq_expr(&self, expr: impl Into<SimpleExpr>) -> Fragment {
        self.expr().eq(expr).into()
    }

    pub fn asc(&self) -> OrderSpec {
        OrderSpec::new(self.as_simple_expr(), Order::Asc)
    }

    pub fn desc(&self) -> OrderSpec {
        OrderSpec::new(self.as_simple_expr(), Order::Desc)
    }

    pub fn max(&self) -> SimpleExpr {
        Func::max(self.as_simple_expr()).into()
    }

    pub fn min(&self) -> SimpleExpr {
        Func::min(self.as_simple_expr()).into()
    }

    pub fn avg(&self) -> SimpleExpr {
        Func::avg(self.as_simple_expr()).into()
    }

    pub fn sum(&self) -> SimpleExpr {
        Func::sum(self.as_simple_expr()).into()
    }

    pub fn count(&self) -> SimpleExpr {
        Func::count(self.as_simple_expr()).into()
    }

    /// Ad-hoc join relation `E.self = F.other`, for joining entities that
    /// have no declared relation between them.
    pub fn relation_to<F: EntityTrait>(&self, other: Field<F, T>) -> RelationDef {
        E::belongs_to(F::default())
            .from(self.column)
            .to(other.column)
            .into()
    }

    pub fn eq_sub(&self, sub: ScalarSubQuery) -> Fragment {
        self.expr().eq(sub.into_expr()).into()
    }

    pub fn gt_sub(&self, sub: ScalarSubQuery) -> Fragment {
        self.expr().gt(sub.into_expr()).into()
    }

    pub fn goe_sub(&self, sub: ScalarSubQuery) -> Fragment {
        self.expr().gte(sub.into_expr()).into()
    }

    pub fn lt_sub(&self, sub: ScalarSubQuery) -> Fragment {
        self.expr().lt(sub.into_expr()).into()
    }

    pub fn loe_sub(&self, sub: ScalarSubQuery) -> Fragment {
        self.expr().lte(sub.into_expr()).into()
    }

    pub fn in_sub(&self, sub: ListSubQuery<T>) -> Fragment {
        self.expr().in_subquery(sub.into_statement()).into()
    }

    pub fn not_in_sub(&self, sub: ListSubQuery<T>) -> Fragment {
        self.expr().not_in_subquery(sub.into_statement()).into()
    }
}

impl<E, T> Field<E, T>
where
    E: EntityTrait,
    T: Into<Value>,
{
    pub fn eq(&self, value: impl Into<T>) -> Fragment {
        self.column.eq(Into::<T>::into(value)).into()
    }

    pub fn ne(&self, value: impl Into<T>) -> Fragment {
        self.column.ne(Into::<T>::into(value)).into()
    }

    pub fn gt(&self, value: impl Into<T>) -> Fragment {
        self.column.gt(Into::<T>::into(value)).into()
    }

    /// Greater than or equal.
    pub fn goe(&self, value: impl Into<T>) -> Fragment {
        self.column.gte(Into::<T>::into(value)).into()
    }

    pub fn lt(&self, value: impl Into<T>) -> Fragment {
        self.column.lt(Into::<T>::into(value)).into()
    }

    /// Less than or equal.
    pub fn loe(&self, value: impl Into<T>) -> Fragment {
        self.column.lte(Into::<T>::into(value)).into()
    }

    /// Inclusive range.
    pub fn between(&self, low: impl Into<T>, high: impl Into<T>) -> Fragment {
        self.column
            .between(Into::<T>::into(low), Into::<T>::into(high))
            .into()
    }

    pub fn is_in<I>(&self, values: I) -> Fragment
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.column
            .is_in(values.into_iter().map(Into::<T>::into))
            .into()
    }

    pub fn not_in<I>(&self, values: I) -> Fragment
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.column
            .is_not_in(values.into_iter().map(Into::<T>::into))
            .into()
    }

    /// Equality when `value` is present, absent otherwise.
    pub fn eq_opt(&self, value: Option<impl Into<T>>) -> Fragment {
        crate::fragment_for(value, |v| self.eq(v))
    }

    pub fn ne_opt(&self, value: Option<impl Into<T>>) -> Fragment {
        crate::fragment_for(value, |v| self.ne(v))
    }

    pub fn gt_opt(&self, value: Option<impl Into<T>>) -> Fragment {
        crate::fragment_for(value, |v| self.gt(v))
    }

    pub fn goe_opt(&self, value: Option<impl Into<T>>) -> Fragment {
        crate::fragment_for(value, |v| self.goe(v))
    }

    pub fn lt_opt(&self, value: Option<impl Into<T>>) -> Fragment {
        crate::fragment_for(value, |v| self.lt(v))
    }

    pub fn loe_opt(&self, value: Option<impl Into<T>>) -> Fragment {
        crate::fragment_for(value, |v| self.loe(v))
    }
}

impl<E: EntityTrait> Field<E, String> {
    /// `LIKE %value%`
    pub fn contains(&self, value: impl Into<String>) -> Fragment {
        self.column.contains(Into::<String>::into(value)).into()
    }

    pub fn starts_with(&self, value: impl Into<String>) -> Fragment {
        self.column.starts_with(Into::<String>::into(value)).into()
    }

    pub fn ends_with(&self, value: impl Into<String>) -> Fragment {
        self.column.ends_with(Into::<String>::into(value)).into()
    }

    pub fn contains_opt(&self, value: Option<impl Into<String>>) -> Fragment {
        crate::fragment_for(value, |v| self.contains(v))
    }

    pub fn lower(&self) -> SimpleExpr {
        Func::lower(self.as_simple_expr()).into()
    }

    pub fn upper(&self) -> SimpleExpr {
        Func::upper(self.as_simple_expr()).into()
    }

    /// Case-insensitive equality, folding both sides with the database's `lower()`.
    pub fn eq_ignore_case(&self, value: impl Into<String>) -> Fragment {
        let value: String = value.into();
        Expr::expr(self.lower())
            .eq(Func::lower(Expr::val(value)))
            .into()
    }
}

/// An ORDER BY item built from a field.
#[derive(Clone, Debug)]
pub struct OrderSpec {
    pub(crate) expr: SimpleExpr,
    pub(crate) order: Order,
    pub(crate) nulls: Option<NullOrdering>,
}

impl OrderSpec {
    pub fn new(expr: SimpleExpr, order: Order) -> Self {
        Self {
            expr,
            order,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullOrdering::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullOrdering::Last);
        self
    }
}
