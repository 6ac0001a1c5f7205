pub mod message;
pub mod notification;
pub mod research_group;
pub mod submission;
pub mod user;
