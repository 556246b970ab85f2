pub mod db;
pub mod projects;
pub mod tasks;
pub mod team;
