pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod hero_service;
pub mod hero_service_impl;
pub use hero_service::{HeroError, HeroService};
pub use hero_service_impl::SeaOrmHeroService;

pub mod community_service;
pub mod community_service_impl;
pub use community_service::{CommunityError, CommunityService};
pub use community_service_impl::SeaOrmCommunityService;
