//! Query examples over the member/team schema: joins, subqueries,
//! projections, CASE expressions and bulk statements.

use log::debug;
use refract::{Projection, QueryFactory, RefractResult, SubQuery};
use sea_orm::sea_query::{Alias, BinOper, Expr, Func, SimpleExpr};
use sea_orm::{JoinType, RelationTrait};

use crate::dto::{MemberDto, UserDto};
use crate::entities::{member, team};

pub const MEMBER_SUB: &str = "member_sub";

pub async fn find_by_username(
    factory: &QueryFactory,
    username: &str,
) -> RefractResult<Option<member::Model>> {
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::username.eq(username))
        .fetch_one()
        .await
}

/// Members of `age`, oldest first, then by name with unnamed members last.
pub async fn sorted_by_age_then_name(
    factory: &QueryFactory,
    age: i32,
) -> RefractResult<Vec<member::Model>> {
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::age.eq(age))
        .order_by(member::fields::age.desc())
        .order_by(member::fields::username.asc().nulls_last())
        .fetch()
        .await
}

/// `(team name, average member age)` per team.
pub async fn team_average_ages(factory: &QueryFactory) -> RefractResult<Vec<(String, f64)>> {
    factory
        .select_from::<member::Entity>()
        .join(JoinType::InnerJoin, member::Relation::Team.def())
        .group_by(team::fields::name)
        .order_by(team::fields::name.asc())
        .project(
            Projection::new()
                .field(team::fields::name)
                .expr_as(member::fields::age.avg(), "average_age"),
        )
        .fetch_tuple()
        .await
}

/// Members of the team called `team_name`, through the declared relation.
pub async fn members_of_team(
    factory: &QueryFactory,
    team_name: &str,
) -> RefractResult<Vec<member::Model>> {
    factory
        .select_from::<member::Entity>()
        .join(JoinType::InnerJoin, member::Relation::Team.def())
        .filter(team::fields::name.eq(team_name))
        .order_by(member::fields::id.asc())
        .fetch()
        .await
}

/// Members whose username equals some team's name (no declared relation).
pub async fn members_named_like_teams(factory: &QueryFactory) -> RefractResult<Vec<member::Model>> {
    let relation = member::fields::username.relation_to(team::fields::name);
    factory
        .select_from::<member::Entity>()
        .join(JoinType::InnerJoin, relation)
        .order_by(member::fields::id.asc())
        .fetch()
        .await
}

/// Every member, with its team only when that team is called `team_name`.
pub async fn members_with_team_named(
    factory: &QueryFactory,
    team_name: &str,
) -> RefractResult<Vec<(member::Model, Option<team::Model>)>> {
    factory
        .select_from::<member::Entity>()
        .join_on(
            JoinType::LeftJoin,
            member::Relation::Team.def(),
            team::fields::name.eq(team_name),
        )
        .order_by(member::fields::id.asc())
        .fetch_pairs(team::Entity)
        .await
}

/// Every member, with the team sharing its username if there is one.
pub async fn members_outer_joined_by_name(
    factory: &QueryFactory,
) -> RefractResult<Vec<(member::Model, Option<team::Model>)>> {
    let relation = member::fields::username.relation_to(team::fields::name);
    factory
        .select_from::<member::Entity>()
        .join(JoinType::LeftJoin, relation)
        .order_by(member::fields::id.asc())
        .fetch_pairs(team::Entity)
        .await
}

/// Load a member and its team in one statement.
pub async fn find_with_team(
    factory: &QueryFactory,
    username: &str,
) -> RefractResult<Option<(member::Model, Option<team::Model>)>> {
    let mut rows = factory
        .select_from::<member::Entity>()
        .join(JoinType::InnerJoin, member::Relation::Team.def())
        .filter(member::fields::username.eq(username))
        .take(1)
        .fetch_pairs(team::Entity)
        .await?;
    Ok(rows.pop())
}

pub async fn oldest_members(factory: &QueryFactory) -> RefractResult<Vec<member::Model>> {
    let sub = SubQuery::<member::Entity>::of(MEMBER_SUB);
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::age.eq_sub(sub.max(member::fields::age)))
        .fetch()
        .await
}

pub async fn members_at_least_average_age(
    factory: &QueryFactory,
) -> RefractResult<Vec<member::Model>> {
    let sub = SubQuery::<member::Entity>::of(MEMBER_SUB);
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::age.goe_sub(sub.avg(member::fields::age)))
        .order_by(member::fields::age.asc())
        .fetch()
        .await
}

/// Members whose age appears among ages strictly greater than `age`.
pub async fn members_with_age_in_older_than(
    factory: &QueryFactory,
    age: i32,
) -> RefractResult<Vec<member::Model>> {
    let sub = SubQuery::<member::Entity>::of(MEMBER_SUB);
    let older = sub.list(member::fields::age, sub.field(member::fields::age).gt(age));
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::age.in_sub(older))
        .order_by(member::fields::age.asc())
        .fetch()
        .await
}

/// `(username, average age of all members)` per member.
pub async fn usernames_with_average_age(
    factory: &QueryFactory,
) -> RefractResult<Vec<(Option<String>, f64)>> {
    let sub = SubQuery::<member::Entity>::of(MEMBER_SUB);
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .project(
            Projection::new()
                .field(member::fields::username)
                .expr_as(sub.avg(member::fields::age).into_expr(), "average_age"),
        )
        .fetch_tuple()
        .await
}

/// Simple CASE on exact ages.
pub async fn age_labels(factory: &QueryFactory) -> RefractResult<Vec<String>> {
    let label: SimpleExpr = Expr::case(member::fields::age.eq(10), "ten")
        .case(member::fields::age.eq(20), "twenty")
        .finally("other")
        .into();
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .select_expr(label, "label")
        .fetch_tuple()
        .await
}

/// Searched CASE on age ranges.
pub async fn age_bands(factory: &QueryFactory) -> RefractResult<Vec<String>> {
    let band: SimpleExpr = Expr::case(member::fields::age.between(0, 20), "0-20")
        .case(member::fields::age.between(21, 30), "21-30")
        .finally("older")
        .into();
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .select_expr(band, "band")
        .fetch_tuple()
        .await
}

/// `(username, constant)` pairs.
pub async fn usernames_with_constant(
    factory: &QueryFactory,
    constant: &str,
) -> RefractResult<Vec<(Option<String>, String)>> {
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .project(
            Projection::new()
                .field(member::fields::username)
                .expr_as(Expr::val(constant), "constant"),
        )
        .fetch_tuple()
        .await
}

/// `username || '_' || age` for the given member.
pub async fn username_and_age(
    factory: &QueryFactory,
    username: &str,
) -> RefractResult<Vec<String>> {
    let concat = BinOper::Custom("||");
    let joined = Expr::expr(
        member::fields::username
            .expr()
            .binary(concat, Expr::val("_")),
    )
    .binary(concat, member::fields::age.as_simple_expr());
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::username.eq(username))
        .select_expr(joined, "joined")
        .fetch_tuple()
        .await
}

pub async fn usernames(factory: &QueryFactory) -> RefractResult<Vec<Option<String>>> {
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .project(Projection::new().field(member::fields::username))
        .fetch_tuple()
        .await
}

pub async fn member_dtos(factory: &QueryFactory) -> RefractResult<Vec<MemberDto>> {
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .project(
            Projection::new()
                .field(member::fields::username)
                .field(member::fields::age),
        )
        .fetch()
        .await
}

/// Every member's name paired with the maximum age across all members.
pub async fn user_dtos_with_max_age(factory: &QueryFactory) -> RefractResult<Vec<UserDto>> {
    let sub = SubQuery::<member::Entity>::of(MEMBER_SUB);
    factory
        .select_from::<member::Entity>()
        .order_by(member::fields::id.asc())
        .project(
            Projection::new()
                .field_as(member::fields::username, "name")
                .expr_as(sub.max(member::fields::age).into_expr(), "age"),
        )
        .fetch()
        .await
}

/// Rename every member younger than `age`; returns rows affected.
pub async fn rename_younger_than(
    factory: &QueryFactory,
    age: i32,
    username: &str,
) -> RefractResult<u64> {
    let affected = factory
        .update::<member::Entity>()
        .set(member::fields::username, username)
        .filter(member::fields::age.lt(age))
        .execute()
        .await?;
    debug!("renamed {affected} member(s) younger than {age}");
    Ok(affected)
}

pub async fn multiply_ages(factory: &QueryFactory, factor: i32) -> RefractResult<u64> {
    factory
        .update::<member::Entity>()
        .set_expr(member::fields::age, member::fields::age.expr().mul(factor))
        .execute()
        .await
}

pub async fn delete_older_than(factory: &QueryFactory, age: i32) -> RefractResult<u64> {
    factory
        .delete::<member::Entity>()
        .filter(member::fields::age.gt(age))
        .execute()
        .await
}

/// Usernames with `from` replaced by `to`, via the SQL `replace` function.
pub async fn replaced_usernames(
    factory: &QueryFactory,
    from: &str,
    to: &str,
) -> RefractResult<Vec<String>> {
    let replaced: SimpleExpr = Func::cust(Alias::new("replace"))
        .arg(member::fields::username.as_simple_expr())
        .arg(from)
        .arg(to)
        .into();
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::username.is_not_null())
        .order_by(member::fields::id.asc())
        .select_expr(replaced, "replaced")
        .fetch_tuple()
        .await
}

/// Usernames already in lower case.
pub async fn lowercase_usernames(factory: &QueryFactory) -> RefractResult<Vec<String>> {
    factory
        .select_from::<member::Entity>()
        .filter(member::fields::username.eq_expr(member::fields::username.lower()))
        .order_by(member::fields::id.asc())
        .select_expr(member::fields::username.as_simple_expr(), "username")
        .fetch_tuple()
        .await
}
