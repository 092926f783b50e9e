pub mod types;
pub use types::{ActionRepository, ActionState, ActionStatus, DeploymentState, InMemoryActionRepository};
