//! Member/team schema queried through `refract`.

pub mod dto;
pub mod entities;
pub mod queries;
pub mod search;

pub use dto::{MemberDto, UserDto};
pub use search::MemberSearchCondition;
