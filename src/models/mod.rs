//! Data models for Research Tracker entities.
//!
//! Wire names follow the backend's camelCase JSON:
//!
//! - `Project`: top-level research project with optional date range
//! - `Milestone`: dated task under a project with completion state
//! - `Document`: uploaded file attached to a project

pub mod document;
pub mod milestone;
pub mod project;

pub use document::Document;
pub use milestone::{Milestone, NewMilestone};
pub use project::{NewProject, Project};
