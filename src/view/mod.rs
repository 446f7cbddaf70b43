pub use chart::*;
pub use filter::*;
pub use page::*;

mod chart;
mod filter;
mod page;
