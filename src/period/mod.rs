//! Period module
//!
//! A period is the (month, year) pair that identifies one disclosure cycle
//! on the portal. Every crawl run targets exactly one period.

mod labels;
mod month_year;

pub use labels::{month_label, MONTH_LABELS};
pub use month_year::Period;
