pub mod m202601120001_create_users;
pub mod m202601120002_create_research_groups;
pub mod m202601120003_create_submissions;
pub mod m202601120004_create_messages;
pub mod m202601120005_create_notifications;
