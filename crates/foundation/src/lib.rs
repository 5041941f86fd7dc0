pub mod bounds;
pub mod ids;
pub mod layout;
pub mod math;
pub mod text;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use ids::*;
pub use time::*;
