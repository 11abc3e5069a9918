pub mod common;
pub mod users;
pub mod flights;

pub use common::*;
pub use users::*;
pub use flights::*;
