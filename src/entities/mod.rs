pub mod prelude;

pub mod abilities;
pub mod comments;
pub mod feedback;
pub mod heroes;
pub mod users;
