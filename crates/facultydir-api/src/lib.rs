pub mod routes;
pub mod store;

pub use routes::router;
pub use store::{FacultyRow, FacultyStore, SearchParams};
