pub mod config;
pub mod conversion;
pub mod definition;
pub mod document;

pub use config::*;
pub use conversion::*;
pub use definition::*;
pub use document::*;
