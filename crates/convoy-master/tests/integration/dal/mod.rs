pub mod deployments;
pub mod settings;
