pub mod ability;
pub mod comment;
pub mod feedback;
pub mod hero;
pub mod user;
