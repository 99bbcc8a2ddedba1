pub mod post;
pub mod topic;
pub mod user;

pub use post::{Post, PostPatch, PostStatus};
pub use topic::{Topic, TopicPatch};
pub use user::{Role, User, UserPatch, UserResponse};
