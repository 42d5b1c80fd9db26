//! Dynamic member search: every condition is optional and an absent one
//! simply does not constrain the result.

use refract::{Fragment, QueryFactory, RefractResult};
use sea_orm::RelationTrait;
use serde::{Deserialize, Serialize};

use crate::entities::{member, team};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn to_fragment(&self) -> Fragment {
        refract::all![
            username_eq(self.username.as_deref()),
            team_name_eq(self.team_name.as_deref()),
            member::fields::age.goe_opt(self.age_goe),
            member::fields::age.loe_opt(self.age_loe),
        ]
    }
}

pub fn username_eq(username: Option<&str>) -> Fragment {
    member::fields::username.eq_opt(username)
}

pub fn age_eq(age: Option<i32>) -> Fragment {
    member::fields::age.eq_opt(age)
}

pub fn team_name_eq(team_name: Option<&str>) -> Fragment {
    team::fields::name.eq_opt(team_name)
}

/// Username and age equality, each only when given.
pub fn all_eq(username: Option<&str>, age: Option<i32>) -> Fragment {
    username_eq(username).and(age_eq(age))
}

/// Members matching `username` and `age`, fragments combined pairwise.
pub async fn search_members(
    factory: &QueryFactory,
    username: Option<&str>,
    age: Option<i32>,
) -> RefractResult<Vec<member::Model>> {
    factory
        .select_from::<member::Entity>()
        .filter(all_eq(username, age))
        .order_by(member::fields::id.asc())
        .fetch()
        .await
}

/// Same search, folding a list of fragments instead.
pub async fn search_members_folded(
    factory: &QueryFactory,
    username: Option<&str>,
    age: Option<i32>,
) -> RefractResult<Vec<member::Model>> {
    let conditions = vec![username_eq(username), age_eq(age)];
    factory
        .select_from::<member::Entity>()
        .filter(refract::compose(conditions))
        .order_by(member::fields::id.asc())
        .fetch()
        .await
}

/// Members with their team, filtered by a [`MemberSearchCondition`].
pub async fn search_with_team(
    factory: &QueryFactory,
    condition: &MemberSearchCondition,
) -> RefractResult<Vec<(member::Model, Option<team::Model>)>> {
    factory
        .select_from::<member::Entity>()
        .join(sea_orm::JoinType::LeftJoin, member::Relation::Team.def())
        .filter(condition.to_fragment())
        .order_by(member::fields::id.asc())
        .fetch_pairs(team::Entity)
        .await
}
