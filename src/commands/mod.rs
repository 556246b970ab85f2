pub mod init;
pub mod insights;
pub mod project;
pub mod sync;
pub mod task;
pub mod team;
