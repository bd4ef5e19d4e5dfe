pub mod ability;
pub mod community;
pub mod hero;
pub mod user;

/// Result of an edit that may have replaced stored media. `superseded` holds
/// the public URLs the record no longer points to.
#[derive(Debug, Clone)]
pub struct Updated<T> {
    pub record: T,
    pub superseded: Vec<String>,
}
