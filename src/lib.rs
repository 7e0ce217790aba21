pub mod checker;
pub mod config;
pub mod error;
pub mod exposure;
pub mod input;
pub mod model;
pub mod output;
pub mod repo;

pub use config::Config;
pub use error::{Error, Result};
pub use exposure::ExposureChecker;
pub use model::{AdvisoryFact, CheckReport, GraphEdge, PackageRecord, Verdict};
