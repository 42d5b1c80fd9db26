use log::trace;
use sea_orm::sea_query::Condition;

use crate::Fragment;

/// Build a fragment from an optional input.
///
/// `None` yields an absent fragment; `Some(v)` hands `v` to `predicate`.
///
/// ```ignore
/// let by_name = fragment_for(username, |name| member::fields::username.eq(name));
/// ```
pub fn fragment_for<V, F>(value: Option<V>, predicate: F) -> Fragment
where
    F: FnOnce(V) -> Fragment,
{
    match value {
        Some(value) => predicate(value),
        None => Fragment::absent(),
    }
}

/// AND together every present fragment, keeping input order.
///
/// Returns an absent fragment when nothing is present.
pub fn compose<I>(fragments: I) -> Fragment
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    fold(fragments, Condition::all)
}

/// Alias of [`compose`].
pub fn all<I>(fragments: I) -> Fragment
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    compose(fragments)
}

/// OR together every present fragment. Absent entries are skipped, so an
/// OR over only absent fragments is absent (unconstrained).
pub fn any<I>(fragments: I) -> Fragment
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    fold(fragments, Condition::any)
}

fn fold<I>(fragments: I, junction: fn() -> Condition) -> Fragment
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    let mut present: Vec<Condition> = fragments
        .into_iter()
        .filter_map(|fragment| fragment.into().into_inner())
        .collect();
    trace!("composing {} present fragment(s)", present.len());

    match present.len() {
        0 => Fragment::absent(),
        1 => present.pop().into(),
        _ => present
            .into_iter()
            .fold(junction(), |acc, condition| acc.add(condition))
            .into(),
    }
}

/// Variadic [`compose`]: `all![a, b, c]`.
#[macro_export]
macro_rules! all {
    () => {
        $crate::Fragment::absent()
    };
    ($($fragment:expr),+ $(,)?) => {
        $crate::compose([$($crate::Fragment::from($fragment)),+])
    };
}

/// Variadic [`any`]: `any![a, b, c]`.
#[macro_export]
macro_rules! any {
    () => {
        $crate::Fragment::absent()
    };
    ($($fragment:expr),+ $(,)?) => {
        $crate::any([$($crate::Fragment::from($fragment)),+])
    };
}
