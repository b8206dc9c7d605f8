pub mod likes;
pub mod subscriptions;
pub mod users;
pub mod videos;

pub use likes::LikeRepository;
pub use subscriptions::SubscriptionRepository;
pub use users::UserRepository;
pub use videos::VideoRepository;
