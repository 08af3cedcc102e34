//! Tournament domain models.
//!
//! | Type | Role |
//! |------|------|
//! | [`Venue`] | Home or away, one team in one week |
//! | [`PatternMatrix`] | Home/away pattern of every team ("Table A") |
//! | [`Timetable`] | Opponent of every team in every week ("Table B") |
//!
//! Free functions in [`sequence`] implement the run-length rule and the
//! complement used by the mirror invariant.

mod pattern;
pub mod sequence;
mod timetable;

pub use pattern::PatternMatrix;
pub use sequence::Venue;
pub use timetable::Timetable;
