pub mod url_validator;
pub mod prober;
pub mod dependency_detector;

pub use url_validator::UrlValidator;
pub use prober::{RepositoryProber, ProbeReport};
pub use dependency_detector::{DependencyDetector, DependencyMap, Ecosystem};
