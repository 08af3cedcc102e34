//! Season planning and KPI evaluation.
//!
//! `SeasonPlanner` chains the pattern GA and the backtracking resolver;
//! `SeasonKpi` summarizes a pattern's trips and home/away stretches.
//!
//! # References
//!
//! - Ribeiro & Urrutia (2007), "Heuristics for the mirrored traveling
//!   tournament problem"
//! - de Werra (1981), "Scheduling in sports"

mod kpi;
mod planner;

pub use kpi::SeasonKpi;
pub use planner::{SeasonPlan, SeasonPlanner};
