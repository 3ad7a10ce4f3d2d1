//! Command-line surface: argument parsing and workflow orchestration

pub mod args;
pub mod orchestration;

pub use args::{Args, Settings};
pub use orchestration::{run_push_workflow, PushWorkflowArgs, WorkflowResult};
