pub mod event_bus;
pub mod latest;
pub mod load;

pub use event_bus::*;
pub use latest::*;
pub use load::*;
