pub mod diagram;
pub mod document;
pub mod index;
pub mod region;
pub mod session;
pub mod view;

pub use document::*;
pub use index::*;
pub use region::*;
pub use session::*;
pub use view::*;
