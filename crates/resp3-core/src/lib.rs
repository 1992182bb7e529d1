pub mod constants;
pub mod error;
pub mod value;

pub use error::{Error, Result};
pub use value::{Attribute, Value};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
