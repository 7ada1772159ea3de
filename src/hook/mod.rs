pub mod controller;
pub mod errors;
pub mod failure;
pub mod kind;
pub mod traits;

pub use controller::*;
pub use errors::*;
pub use failure::*;
pub use kind::*;
pub use traits::*;
