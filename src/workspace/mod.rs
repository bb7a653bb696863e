pub mod destination;
pub mod cloner;

pub use destination::{DestinationSelector, ensure_dir};
pub use cloner::{Cloner, preview_files};
