pub mod channel;
pub mod logging;

pub use channel::*;
pub use logging::*;
