//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod discovery_repo;
pub mod engagement_repo;
pub mod item_repo;
pub mod reservation_repo;
pub mod user_repo;
pub mod wishlist_repo;

pub use discovery_repo::DiscoveryRepo;
pub use engagement_repo::EngagementRepo;
pub use item_repo::ItemRepo;
pub use reservation_repo::ReservationRepo;
pub use user_repo::UserRepo;
pub use wishlist_repo::WishlistRepo;
