pub mod account;
pub mod admin;
pub mod documents;
pub mod milestones;
pub mod projects;
