pub mod app;
pub mod logging;
pub mod report;
pub mod scenario;
pub mod utils;

pub use app::{Estimate, estimate, estimate_file, load_tables};
pub use report::{OutputFormat, render};
pub use scenario::{Scenario, ScenarioError};
