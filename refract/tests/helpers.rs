use refract::QueryFactory;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Schema, Set};

pub mod user {
    use refract::Fields;
    use sea_orm::entity::prelude::*;

    #[derive(Fields, Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(nullable)]
        pub username: Option<String>,
        pub age: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[allow(dead_code)]
pub async fn setup_test_db() -> DatabaseConnection {
    let _ = env_logger::builder().is_test(true).try_init();

    let db = Database::connect("sqlite::memory:").await.unwrap();
    let schema = Schema::new(db.get_database_backend());
    let mut table = schema.create_table_from_entity(user::Entity);
    let create = db.get_database_backend().build(table.if_not_exists());
    db.execute(create).await.unwrap();
    db
}

#[allow(dead_code)]
pub async fn insert_user(db: &DatabaseConnection, username: Option<&str>, age: i32) -> user::Model {
    user::ActiveModel {
        username: Set(username.map(str::to_string)),
        age: Set(age),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// member1..member4 aged 10..40, plus a second age-10 user and one without a name.
#[allow(dead_code)]
pub async fn seeded_factory() -> QueryFactory {
    let db = setup_test_db().await;
    insert_user(&db, Some("member1"), 10).await;
    insert_user(&db, Some("member2"), 20).await;
    insert_user(&db, Some("member3"), 30).await;
    insert_user(&db, Some("member4"), 40).await;
    insert_user(&db, Some("member5"), 10).await;
    insert_user(&db, None, 10).await;
    QueryFactory::new(db)
}

#[allow(dead_code)]
pub async fn ids_matching(factory: &QueryFactory, filter: refract::Fragment) -> Vec<i32> {
    let mut ids: Vec<i32> = factory
        .select_from::<user::Entity>()
        .filter(filter)
        .fetch()
        .await
        .unwrap()
        .into_iter()
        .map(|user| user.id)
        .collect();
    ids.sort_unstable();
    ids
}
