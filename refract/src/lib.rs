//! Typed, null-tolerant predicate composition on top of SeaORM.
//!
//! A [`Fragment`] is either a condition or absent ("no constraint").
//! Building fragments from optional inputs and ANDing them together with
//! [`compose`] turns a set of optional search parameters into one WHERE
//! clause without a null check per parameter:
//!
//! ```ignore
//! let filter = refract::all![
//!     member::fields::username.eq_opt(username),
//!     member::fields::age.eq_opt(age),
//! ];
//! let members = factory.select_from::<member::Entity>().filter(filter).fetch().await?;
//! ```

pub mod client;
pub mod compose;
pub mod config;
pub mod error;
pub mod field;
pub mod fragment;
pub mod query_builders;
pub mod subquery;

pub use client::QueryFactory;
pub use compose::{all, any, compose, fragment_for};
pub use config::FactoryConfig;
pub use error::{QueryError, RefractResult};
pub use field::{Field, OrderSpec};
pub use fragment::Fragment;
pub use query_builders::*;
pub use subquery::{AliasedField, ListSubQuery, ScalarSubQuery, SubQuery};

pub use refract_macros::Fields;

// Re-export for generated code and downstream crates
pub use sea_orm;
