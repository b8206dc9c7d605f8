pub mod engagement;
pub mod subscription;
pub mod video;

pub use engagement::EngagementService;
pub use subscription::SubscriptionService;
pub use video::VideoService;
