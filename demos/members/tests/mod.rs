pub mod helpers {
    use refract::QueryFactory;
    use sea_orm::{
        ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set,
    };

    use members::entities::{member, team};

    async fn create_table<E: EntityTrait>(db: &DatabaseConnection, schema: &Schema, entity: E) {
        let mut table = schema.create_table_from_entity(entity);
        let create = db.get_database_backend().build(table.if_not_exists());
        db.execute(create).await.unwrap();
    }

    pub async fn setup_test_db() -> DatabaseConnection {
        let _ = env_logger::builder().is_test(true).try_init();

        let db = Database::connect("sqlite::memory:").await.unwrap();
        let schema = Schema::new(db.get_database_backend());

        // team first: member references it
        create_table(&db, &schema, team::Entity).await;
        create_table(&db, &schema, member::Entity).await;
        db
    }

    pub async fn insert_team(db: &DatabaseConnection, name: &str) -> team::Model {
        team::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    pub async fn insert_member(
        db: &DatabaseConnection,
        username: Option<&str>,
        age: i32,
        team_id: Option<i32>,
    ) -> member::Model {
        member::ActiveModel {
            username: Set(username.map(str::to_string)),
            age: Set(age),
            team_id: Set(team_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    /// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40).
    pub async fn seeded_factory() -> QueryFactory {
        let db = setup_test_db().await;
        let team_a = insert_team(&db, "teamA").await;
        let team_b = insert_team(&db, "teamB").await;
        insert_member(&db, Some("member1"), 10, Some(team_a.id)).await;
        insert_member(&db, Some("member2"), 20, Some(team_a.id)).await;
        insert_member(&db, Some("member3"), 30, Some(team_b.id)).await;
        insert_member(&db, Some("member4"), 40, Some(team_b.id)).await;
        QueryFactory::new(db)
    }

    pub fn ages(members: &[member::Model]) -> Vec<i32> {
        members.iter().map(|member| member.age).collect()
    }

    pub fn names(members: &[member::Model]) -> Vec<Option<&str>> {
        members
            .iter()
            .map(|member| member.username.as_deref())
            .collect()
    }
}

mod search_tests {
    use members::search::{self, MemberSearchCondition};

    use super::helpers::*;

    #[tokio::test]
    async fn test_search_by_username_and_age() {
        let factory = seeded_factory().await;

        let found = search::search_members(&factory, Some("member1"), Some(10))
            .await
            .unwrap();
        assert_eq!(names(&found), vec![Some("member1")]);

        let folded = search::search_members_folded(&factory, Some("member1"), Some(10))
            .await
            .unwrap();
        assert_eq!(found, folded);
    }

    #[tokio::test]
    async fn test_absent_parameters_do_not_constrain() {
        let factory = seeded_factory().await;

        let all = search::search_members(&factory, None, None).await.unwrap();
        assert_eq!(all.len(), 4);

        let by_age = search::search_members(&factory, None, Some(10)).await.unwrap();
        assert_eq!(names(&by_age), vec![Some("member1")]);

        let by_name = search::search_members_folded(&factory, Some("member3"), None)
            .await
            .unwrap();
        assert_eq!(ages(&by_name), vec![30]);
    }

    #[tokio::test]
    async fn test_both_variants_agree() {
        let factory = seeded_factory().await;
        let usernames = [None, Some("member1"), Some("member2"), Some("nobody")];
        let member_ages = [None, Some(10), Some(20), Some(99)];

        for username in usernames {
            for age in member_ages {
                let builder = search::search_members(&factory, username, age)
                    .await
                    .unwrap();
                let folded = search::search_members_folded(&factory, username, age)
                    .await
                    .unwrap();
                assert_eq!(builder, folded, "username={username:?} age={age:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_search_with_team_condition() {
        let factory = seeded_factory().await;
        let condition = MemberSearchCondition {
            team_name: Some("teamB".to_string()),
            age_goe: Some(35),
            age_loe: Some(40),
            ..Default::default()
        };

        let rows = search::search_with_team(&factory, &condition).await.unwrap();
        assert_eq!(rows.len(), 1);
        let (member, team) = &rows[0];
        assert_eq!(member.username.as_deref(), Some("member4"));
        assert_eq!(team.as_ref().map(|team| team.name.as_str()), Some("teamB"));
    }

    #[tokio::test]
    async fn test_empty_search_condition_returns_everyone() {
        let factory = seeded_factory().await;
        let rows = search::search_with_team(&factory, &MemberSearchCondition::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|(_, team)| team.is_some()));
    }
}

mod query_tests {
    use members::entities::{member, team};
    use members::queries::{self, MEMBER_SUB};
    use members::{MemberDto, UserDto};
    use refract::{QueryError, SubQuery};

    use super::helpers::*;

    #[tokio::test]
    async fn test_find_by_username() {
        let factory = seeded_factory().await;

        let member = queries::find_by_username(&factory, "member1").await.unwrap();
        assert_eq!(member.map(|member| member.age), Some(10));

        let missing = queries::find_by_username(&factory, "nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_fetch_one_rejects_several_rows() {
        let factory = seeded_factory().await;
        let result = factory
            .select_from::<member::Entity>()
            .filter(member::fields::age.gt(10))
            .fetch_one()
            .await;
        match result {
            Err(QueryError::NonUniqueResult { entity }) => assert_eq!(entity, "member"),
            other => panic!("expected NonUniqueResult, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sort_with_nulls_last() {
        let factory = seeded_factory().await;
        let db = factory.db();
        insert_member(db, None, 100, None).await;
        insert_member(db, Some("member5"), 100, None).await;
        insert_member(db, Some("member6"), 100, None).await;

        let sorted = queries::sorted_by_age_then_name(&factory, 100).await.unwrap();
        assert_eq!(names(&sorted), vec![Some("member5"), Some("member6"), None]);
    }

    #[tokio::test]
    async fn test_paging_and_count() {
        let factory = seeded_factory().await;

        let page = factory
            .select_from::<member::Entity>()
            .order_by(member::fields::username.desc())
            .skip(1)
            .take(2)
            .fetch()
            .await
            .unwrap();
        assert_eq!(names(&page), vec![Some("member3"), Some("member2")]);

        let total = factory
            .select_from::<member::Entity>()
            .fetch_count()
            .await
            .unwrap();
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn test_aggregates() {
        let factory = seeded_factory().await;
        let row: Vec<(i64, i32, f64, i32, i32)> = factory
            .select_from::<member::Entity>()
            .project(
                refract::Projection::new()
                    .expr_as(member::fields::id.count(), "count")
                    .expr_as(member::fields::age.sum(), "sum")
                    .expr_as(member::fields::age.avg(), "avg")
                    .expr_as(member::fields::age.max(), "max")
                    .expr_as(member::fields::age.min(), "min"),
            )
            .fetch_tuple()
            .await
            .unwrap();
        assert_eq!(row, vec![(4, 100, 25.0, 40, 10)]);
    }

    #[tokio::test]
    async fn test_group_by_team() {
        let factory = seeded_factory().await;
        let averages = queries::team_average_ages(&factory).await.unwrap();
        assert_eq!(
            averages,
            vec![("teamA".to_string(), 15.0), ("teamB".to_string(), 35.0)]
        );
    }

    #[tokio::test]
    async fn test_join_through_relation() {
        let factory = seeded_factory().await;
        let members = queries::members_of_team(&factory, "teamA").await.unwrap();
        assert_eq!(names(&members), vec![Some("member1"), Some("member2")]);
    }

    #[tokio::test]
    async fn test_theta_join() {
        let factory = seeded_factory().await;
        let db = factory.db();
        insert_member(db, Some("teamA"), 0, None).await;
        insert_member(db, Some("teamB"), 0, None).await;
        insert_member(db, Some("teamC"), 0, None).await;

        let members = queries::members_named_like_teams(&factory).await.unwrap();
        assert_eq!(names(&members), vec![Some("teamA"), Some("teamB")]);
    }

    #[tokio::test]
    async fn test_left_join_with_on_filter() {
        let factory = seeded_factory().await;
        let rows = queries::members_with_team_named(&factory, "teamA")
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);

        let teams: Vec<Option<&str>> = rows
            .iter()
            .map(|(_, team)| team.as_ref().map(|team| team.name.as_str()))
            .collect();
        assert_eq!(teams, vec![Some("teamA"), Some("teamA"), None, None]);
    }

    #[tokio::test]
    async fn test_left_join_without_relation() {
        let factory = seeded_factory().await;
        insert_member(factory.db(), Some("teamA"), 0, None).await;

        let rows = queries::members_outer_joined_by_name(&factory)
            .await
            .unwrap();
        assert_eq!(rows.len(), 5);
        let matched: Vec<&str> = rows
            .iter()
            .filter_map(|(_, team)| team.as_ref().map(|team| team.name.as_str()))
            .collect();
        assert_eq!(matched, vec!["teamA"]);
    }

    #[tokio::test]
    async fn test_fetch_join_loads_team() {
        let factory = seeded_factory().await;
        let (member, team) = queries::find_with_team(&factory, "member1")
            .await
            .unwrap()
            .expect("member1 exists");
        assert_eq!(member.username.as_deref(), Some("member1"));
        let team: team::Model = team.expect("member1 has a team");
        assert_eq!(team.name, "teamA");
    }

    #[tokio::test]
    async fn test_subqueries() {
        let factory = seeded_factory().await;

        let oldest = queries::oldest_members(&factory).await.unwrap();
        assert_eq!(ages(&oldest), vec![40]);

        let above_average = queries::members_at_least_average_age(&factory)
            .await
            .unwrap();
        assert_eq!(ages(&above_average), vec![30, 40]);

        let in_list = queries::members_with_age_in_older_than(&factory, 10)
            .await
            .unwrap();
        assert_eq!(ages(&in_list), vec![20, 30, 40]);

        let with_average = queries::usernames_with_average_age(&factory)
            .await
            .unwrap();
        assert_eq!(with_average.len(), 4);
        assert!(with_average.iter().all(|(_, average)| *average == 25.0));
    }

    #[tokio::test]
    async fn test_correlated_subquery() {
        let factory = seeded_factory().await;
        let sub = SubQuery::<member::Entity>::of(MEMBER_SUB);
        // oldest member of each team
        let team_max = sub
            .max(member::fields::age)
            .filter(sub.field(member::fields::team_id).eq_outer(member::fields::team_id));

        let members = factory
            .select_from::<member::Entity>()
            .filter(member::fields::age.eq_sub(team_max))
            .order_by(member::fields::age.asc())
            .fetch()
            .await
            .unwrap();
        assert_eq!(ages(&members), vec![20, 40]);
    }

    #[tokio::test]
    async fn test_case_expressions() {
        let factory = seeded_factory().await;

        let labels = queries::age_labels(&factory).await.unwrap();
        assert_eq!(labels, vec!["ten", "twenty", "other", "other"]);

        let bands = queries::age_bands(&factory).await.unwrap();
        assert_eq!(bands, vec!["0-20", "0-20", "21-30", "older"]);
    }

    #[tokio::test]
    async fn test_constant_and_concat() {
        let factory = seeded_factory().await;

        let rows = queries::usernames_with_constant(&factory, "A").await.unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|(_, constant)| constant == "A"));

        let joined = queries::username_and_age(&factory, "member1").await.unwrap();
        assert_eq!(joined, vec!["member1_10"]);
    }

    #[tokio::test]
    async fn test_projections() {
        let factory = seeded_factory().await;

        let usernames = queries::usernames(&factory).await.unwrap();
        assert_eq!(usernames.len(), 4);
        assert_eq!(usernames[0].as_deref(), Some("member1"));

        let dtos = queries::member_dtos(&factory).await.unwrap();
        assert_eq!(dtos[0], MemberDto::new("member1", 10));
        assert_eq!(dtos[3], MemberDto::new("member4", 40));

        let users = queries::user_dtos_with_max_age(&factory).await.unwrap();
        assert_eq!(users.len(), 4);
        assert_eq!(users[1], UserDto::from(MemberDto::new("member2", 40)));
        assert!(users.iter().all(|user| user.age == 40));
    }

    #[tokio::test]
    async fn test_bulk_update() {
        let factory = seeded_factory().await;

        let renamed = queries::rename_younger_than(&factory, 28, "non-member")
            .await
            .unwrap();
        assert_eq!(renamed, 2);

        let all = factory
            .select_from::<member::Entity>()
            .order_by(member::fields::id.asc())
            .fetch()
            .await
            .unwrap();
        assert_eq!(
            names(&all),
            vec![
                Some("non-member"),
                Some("non-member"),
                Some("member3"),
                Some("member4")
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_arithmetic_and_delete() {
        let factory = seeded_factory().await;

        assert_eq!(queries::multiply_ages(&factory, 2).await.unwrap(), 4);
        let doubled = factory
            .select_from::<member::Entity>()
            .order_by(member::fields::id.asc())
            .fetch()
            .await
            .unwrap();
        assert_eq!(ages(&doubled), vec![20, 40, 60, 80]);

        assert_eq!(queries::delete_older_than(&factory, 18).await.unwrap(), 4);
        let remaining = factory
            .select_from::<member::Entity>()
            .fetch_count()
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let factory = seeded_factory().await;
        assert_eq!(queries::delete_older_than(&factory, 18).await.unwrap(), 3);

        let left = factory
            .select_from::<member::Entity>()
            .fetch()
            .await
            .unwrap();
        assert_eq!(names(&left), vec![Some("member1")]);
    }

    #[tokio::test]
    async fn test_sql_functions() {
        let factory = seeded_factory().await;

        let replaced = queries::replaced_usernames(&factory, "member", "M")
            .await
            .unwrap();
        assert_eq!(replaced, vec!["M1", "M2", "M3", "M4"]);

        insert_member(factory.db(), Some("Shouty"), 50, None).await;
        let lower = queries::lowercase_usernames(&factory).await.unwrap();
        assert_eq!(lower, vec!["member1", "member2", "member3", "member4"]);
    }
}

mod scenario_tests {
    use members::entities::member;
    use refract::{compose, fragment_for, Fragment};

    use super::helpers::*;

    #[tokio::test]
    async fn test_single_condition_search() {
        let factory = seeded_factory().await;
        let username: Option<&str> = Some("member1");
        let age: Option<i32> = None;

        let filter = compose([
            fragment_for(username, |name| member::fields::username.eq(name)),
            fragment_for(age, |age| member::fields::age.eq(age)),
        ]);
        let found = factory
            .select_from::<member::Entity>()
            .filter(filter)
            .fetch()
            .await
            .unwrap();
        assert_eq!(names(&found), vec![Some("member1")]);
    }

    #[tokio::test]
    async fn test_no_condition_search() {
        let factory = seeded_factory().await;
        let filter = compose([Fragment::absent(), Fragment::absent()]);
        assert!(filter.is_absent());

        let found = factory
            .select_from::<member::Entity>()
            .filter(filter)
            .fetch()
            .await
            .unwrap();
        assert_eq!(found.len(), 4);
    }

    #[tokio::test]
    async fn test_conflicting_conditions_search() {
        let factory = seeded_factory().await;
        let filter = compose([
            member::fields::username.eq_opt(Some("member1")),
            member::fields::age.eq_opt(Some(20)),
        ]);
        let found = factory
            .select_from::<member::Entity>()
            .filter(filter)
            .fetch()
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
