pub use group::*;
pub use record::*;
pub use report_date::*;

mod group;
mod record;
mod report_date;
