pub mod errors;
pub mod scan;

pub use errors::{ScanError, ScanResult};
pub use scan::*;
