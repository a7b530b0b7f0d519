mod build;
mod execute;
mod types;


pub(super) use build::{build_plan, resolve_args};
pub(super) use execute::execute_plan;
