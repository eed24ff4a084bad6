//! Report structures, formatters and result persistence

pub mod formatter;
pub mod report;
pub mod sink;
