mod binding;
mod models;

pub use binding::{AccessEntry, Project, RepoBinding};
pub use models::{CreateRepo, RepoDescriptor, UserInfo};
