//! Commands - the operations the CLI exposes over [`AppContext`]
//!
//! [`AppContext`]: crate::context::AppContext

mod reports;
mod token;
mod tracking;
mod workspace;

pub use reports::*;
pub use token::*;
pub use tracking::*;
pub use workspace::*;
