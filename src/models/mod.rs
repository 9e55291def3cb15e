pub mod session;
pub mod snippet;
pub mod error_log;

pub use session::*;
pub use snippet::*;
pub use error_log::*;
