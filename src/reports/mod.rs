//! Reports built on the aggregator

pub mod chart;
pub mod spending;

pub use chart::{BarChart, ChartSink, PieChart};
pub use spending::{CategoryReportRow, SpendingReport};
