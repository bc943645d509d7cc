#[allow(clippy::module_inception)]
pub mod error;
pub mod value;

pub use error::StoreError;
pub use value::{CloneError, RegExpError};
