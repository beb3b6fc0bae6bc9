//! cat client bootstrap: activation state, background collaborators, shutdown.

pub mod activation;
pub mod collaborator;
mod controller;
pub mod scheduler;

pub use activation::{Activation, ActivationFlag};
pub use collaborator::{Collaborator, Collaborators, Idle, ShutdownSignal};
pub use controller::LifecycleController;
pub use scheduler::Scheduler;
