pub use super::abilities::Entity as Abilities;
pub use super::comments::Entity as Comments;
pub use super::feedback::Entity as Feedback;
pub use super::heroes::Entity as Heroes;
pub use super::users::Entity as Users;
