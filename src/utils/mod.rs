pub mod date;
pub mod error;
pub mod id;
pub mod path;

pub use error::{AppError, AppResult};
