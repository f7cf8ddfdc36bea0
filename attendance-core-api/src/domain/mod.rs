pub mod attendance;
pub mod batch;
pub mod calendar;
pub mod leave;
pub mod requests;
pub mod worker;

pub use attendance::*;
pub use batch::*;
pub use calendar::*;
pub use leave::*;
pub use requests::*;
pub use worker::*;
