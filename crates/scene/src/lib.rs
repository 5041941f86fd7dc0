pub mod dataset;
pub mod filter;
pub mod highlight;
pub mod legend;
pub mod record;
pub mod state;
pub mod validate;
pub mod visibility;

pub use dataset::*;
pub use filter::*;
pub use legend::*;
pub use record::*;
pub use state::*;
