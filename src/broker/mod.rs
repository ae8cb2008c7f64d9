pub mod counter;
pub mod engine;
pub mod message;
pub mod subscription;
pub mod topic;

pub use engine::Broker;
pub use message::Message;
pub use subscription::Subscription;
pub use topic::{Delivery, Topic};
