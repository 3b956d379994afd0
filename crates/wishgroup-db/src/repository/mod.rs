//! SurrealDB repository implementations.

mod group;
mod invitation;
mod role;
mod user;
mod wishlist;

pub use group::SurrealGroupRepository;
pub use invitation::SurrealInvitationRepository;
pub use role::SurrealRoleRepository;
pub use user::SurrealUserRepository;
pub use wishlist::SurrealWishListRepository;
