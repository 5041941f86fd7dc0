pub mod check;
pub mod entry;
pub mod page;
pub mod registry;

pub use check::*;
pub use entry::*;
pub use page::*;
pub use registry::*;
