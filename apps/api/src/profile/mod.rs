// ZIP profile pipeline: sources → builder → classifier → recommendations.
// Presentation (CLI text, JSON handler) consumes `report::TaxBreakReport`.

pub mod builder;
pub mod classifier;
pub mod handlers;
pub mod recommendations;
pub mod report;
