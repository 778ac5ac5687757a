pub mod content;
pub mod job;
pub mod resume;
pub mod salary;
pub mod user;
