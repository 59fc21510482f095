pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::{AppConfig, DefaultColumn};
pub use error::BoardError;
pub use result::BoardResult;
pub use traits::Ranked;
