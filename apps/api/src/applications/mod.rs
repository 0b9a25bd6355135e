// Job Applications: the one resource this service manages.
// Handlers talk to the repository trait only; SQL stays in repository.rs and db.rs.

pub mod dto;
pub mod handlers;
pub mod repository;
pub mod validation;

pub use repository::{JobApplicationRepository, SqlJobApplicationRepository};
