pub mod member;
pub mod session;
pub mod settings;

pub use member::*;
pub use session::*;
pub use settings::*;
