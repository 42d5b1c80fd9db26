use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// Member projection: name and age only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl MemberDto {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: Some(username.into()),
            age,
        }
    }
}

/// Same shape as [`MemberDto`] under different column names; filled from
/// aliased projections (`username AS name`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}

impl From<MemberDto> for UserDto {
    fn from(dto: MemberDto) -> Self {
        Self {
            name: dto.username,
            age: dto.age,
        }
    }
}
