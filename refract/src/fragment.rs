use std::ops::{BitAnd, BitOr, Not};

use sea_orm::sea_query::{Condition, IntoCondition, SimpleExpr};

/// A filter condition that may be absent.
///
/// An absent fragment means "no constraint". It is the identity element of
/// [`Fragment::and`]: `a.and(absent) == a`, and an AND over nothing but
/// absent fragments is itself absent. Fragments are immutable values and are
/// cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct Fragment {
    condition: Option<Condition>,
}

impl Fragment {
    /// The fragment that constrains nothing.
    pub const fn absent() -> Self {
        Self { condition: None }
    }

    pub fn is_absent(&self) -> bool {
        self.condition.is_none()
    }

    pub fn is_present(&self) -> bool {
        self.condition.is_some()
    }

    /// Borrow the underlying condition, if any.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Unwrap into the underlying condition. `None` means "match everything".
    pub fn into_inner(self) -> Option<Condition> {
        self.condition
    }

    /// Logical AND; absent operands are dropped.
    pub fn and(self, other: impl Into<Fragment>) -> Fragment {
        match (self.condition, other.into().condition) {
            (None, rhs) => Fragment { condition: rhs },
            (lhs, None) => Fragment { condition: lhs },
            (Some(lhs), Some(rhs)) => Condition::all().add(lhs).add(rhs).into(),
        }
    }

    /// Logical OR; an absent operand contributes no alternative and is dropped.
    pub fn or(self, other: impl Into<Fragment>) -> Fragment {
        match (self.condition, other.into().condition) {
            (None, rhs) => Fragment { condition: rhs },
            (lhs, None) => Fragment { condition: lhs },
            (Some(lhs), Some(rhs)) => Condition::any().add(lhs).add(rhs).into(),
        }
    }

    /// Negation. Negating an absent fragment leaves it absent.
    pub fn negate(self) -> Fragment {
        Fragment {
            condition: self.condition.map(Condition::not),
        }
    }
}

impl From<SimpleExpr> for Fragment {
    fn from(expr: SimpleExpr) -> Self {
        Condition::all().add(expr).into()
    }
}

impl From<Condition> for Fragment {
    fn from(condition: Condition) -> Self {
        Fragment {
            condition: Some(condition),
        }
    }
}

impl From<Option<Condition>> for Fragment {
    fn from(condition: Option<Condition>) -> Self {
        Fragment { condition }
    }
}

impl From<Option<Fragment>> for Fragment {
    fn from(fragment: Option<Fragment>) -> Self {
        fragment.unwrap_or_default()
    }
}

// Absent renders as an empty `Condition::all()`, which SeaQuery treats as TRUE.
impl From<Fragment> for Condition {
    fn from(fragment: Fragment) -> Self {
        fragment.condition.unwrap_or_else(Condition::all)
    }
}

impl IntoCondition for Fragment {
    fn into_condition(self) -> Condition {
        self.into()
    }
}

impl FromIterator<Fragment> for Fragment {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        crate::compose(iter)
    }
}

impl BitAnd for Fragment {
    type Output = Fragment;

    fn bitand(self, rhs: Fragment) -> Fragment {
        self.and(rhs)
    }
}

impl BitOr for Fragment {
    type Output = Fragment;

    fn bitor(self, rhs: Fragment) -> Fragment {
        self.or(rhs)
    }
}

impl Not for Fragment {
    type Output = Fragment;

    fn not(self) -> Fragment {
        self.negate()
    }
}
