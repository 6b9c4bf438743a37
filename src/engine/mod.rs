mod graph;
mod timeline;

pub use graph::FollowError;
pub use graph::InitializeOutcome;
pub use graph::ListError;
pub use graph::SocialGraph;
pub use graph::UnfollowError;
pub use timeline::Post;
pub use timeline::Timeline;
pub use timeline::TIMELINE_CAPACITY;
