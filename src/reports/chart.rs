//! Chart sinks
//!
//! A sink receives `(label, value)` points with an optional spending tier and
//! decides how to draw them. Two text renderers are provided: horizontal bars
//! for percent-of-limit values and a share-of-total breakdown.

use crate::aggregator::SpendTier;
use crate::display::report::{format_bar, format_percentage, truncate};

const LABEL_WIDTH: usize = 18;

/// Widest bar a chart will draw, in characters
pub const MAX_CHART_WIDTH: usize = 200;

/// Receives chart points; rendering is up to the implementation
pub trait ChartSink {
    fn push(&mut self, label: &str, value: f64, tier: Option<SpendTier>);

    /// Draw everything pushed so far
    fn render(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
struct ChartPoint {
    label: String,
    value: f64,
    tier: Option<SpendTier>,
}

fn tier_marker(tier: Option<SpendTier>) -> &'static str {
    match tier {
        Some(SpendTier::Safe) => " ",
        Some(SpendTier::Warning) => "!",
        Some(SpendTier::Over) => "X",
        None => " ",
    }
}

/// Horizontal bars scaled to the largest value, or to 100 if that is larger
///
/// Values are expected to be percentages of a maximum, so a bar that would
/// pass 100 is drawn full and flagged by its tier marker.
#[derive(Debug, Clone)]
pub struct BarChart {
    width: usize,
    points: Vec<ChartPoint>,
}

impl BarChart {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.clamp(1, MAX_CHART_WIDTH),
            points: Vec::new(),
        }
    }
}

impl ChartSink for BarChart {
    fn push(&mut self, label: &str, value: f64, tier: Option<SpendTier>) {
        self.points.push(ChartPoint {
            label: label.to_string(),
            value,
            tier,
        });
    }

    fn render(&self) -> String {
        if self.points.is_empty() {
            return "No categories with a maximum limit.\n".to_string();
        }

        let mut output = String::new();
        for point in &self.points {
            output.push_str(&format!(
                "{:<width$} {} |{}| {:>7} {}\n",
                truncate(&point.label, LABEL_WIDTH),
                tier_marker(point.tier),
                format_bar(point.value, 100.0, self.width),
                format!("{:.1}%", point.value),
                point.tier.map(|t| t.as_str()).unwrap_or(""),
                width = LABEL_WIDTH
            ));
        }
        output
    }
}

/// Share-of-total breakdown, one slice per label
#[derive(Debug, Clone)]
pub struct PieChart {
    width: usize,
    points: Vec<ChartPoint>,
}

impl PieChart {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.clamp(1, MAX_CHART_WIDTH),
            points: Vec::new(),
        }
    }

    /// Each point's percent of the sum of all non-negative values
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total: f64 = self.points.iter().map(|p| p.value.max(0.0)).sum();
        self.points
            .iter()
            .map(|p| {
                let share = if total > 0.0 {
                    p.value.max(0.0) / total * 100.0
                } else {
                    0.0
                };
                (p.label.as_str(), share)
            })
            .collect()
    }
}

impl ChartSink for PieChart {
    fn push(&mut self, label: &str, value: f64, tier: Option<SpendTier>) {
        self.points.push(ChartPoint {
            label: label.to_string(),
            value,
            tier,
        });
    }

    fn render(&self) -> String {
        let shares = self.shares();
        if shares.iter().all(|(_, share)| *share == 0.0) {
            return "No spending in this period.\n".to_string();
        }

        let mut output = String::new();
        for ((label, share), point) in shares.iter().zip(&self.points) {
            output.push_str(&format!(
                "{:<width$} {} {} {:>6}\n",
                truncate(label, LABEL_WIDTH),
                tier_marker(point.tier),
                format_bar(*share, 100.0, self.width),
                format_percentage(*share),
                width = LABEL_WIDTH
            ));
        }
        output
    }
}
