pub mod orchestrator;

pub use orchestrator::{generate_report, run, Config};
