pub mod filter;
pub mod job;
pub mod sort;
pub mod source;

pub use filter::*;
pub use job::*;
pub use sort::*;
pub use source::*;
