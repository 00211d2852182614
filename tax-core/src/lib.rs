pub mod calculations;
pub mod models;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use calculations::TaxEngine;
pub use models::*;
pub use validation::{InputError, validate_inputs};
