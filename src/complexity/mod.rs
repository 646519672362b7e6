pub mod cyclomatic;

pub use cyclomatic::{calculate_cyclomatic, count_decision_points, is_decision_point};
