pub mod catalog;
pub mod readings;
pub mod status;

pub use catalog::{BiomarkerDefinition, Catalog};
pub use readings::BiomarkerReadings;
pub use status::{evaluate_status, BiomarkerStatus};
