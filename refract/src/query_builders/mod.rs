pub mod delete_many;
pub mod many;
pub mod projection;
pub mod update_many;

pub use delete_many::DeleteManyQuery;
pub use many::SelectQuery;
pub use projection::{Projection, ProjectionQuery};
pub use update_many::UpdateManyQuery;
