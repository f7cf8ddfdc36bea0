pub mod identifiable;
pub mod attendance;
pub mod leave;
pub mod salary;
pub mod site;
pub mod worker;

// Re-exports
pub use identifiable::*;
pub use attendance::*;
pub use leave::*;
pub use salary::*;
pub use site::*;
pub use worker::*;
