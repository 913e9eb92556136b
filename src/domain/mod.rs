pub mod exam;
pub mod topic;

pub use exam::{Exam, Subject};
pub use topic::{Topic, TopicStatus};
