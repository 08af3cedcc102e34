//! Structural validation of patterns and timetables.
//!
//! Checks a [`PatternMatrix`] against the mirror and run-length invariants
//! and a [`Timetable`] against the round-robin rules:
//! - every team has one in-range opponent per week, never itself
//! - pairings are symmetric
//! - each fixture pairs a home team with an away team
//! - every pair meets exactly once in the first half
//! - the second half repeats the first
//!
//! All problems are collected rather than stopping at the first one.

use crate::models::{PatternMatrix, Timetable};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Team or week counts do not match.
    DimensionMismatch,
    /// A team is not the complement of its partner.
    MirrorViolation,
    /// A full sequence has too many consecutive games at one venue.
    RunTooLong,
    /// An opponent index is out of range.
    UnknownOpponent,
    /// A team is scheduled against itself.
    SelfMatch,
    /// `a` plays `b` but `b` does not play `a`.
    AsymmetricPairing,
    /// Both teams of a fixture are home, or both away.
    VenueConflict,
    /// A pair meets more than once in the first half.
    RepeatedPairing,
    /// A pair never meets in the first half.
    MissingPairing,
    /// The second half does not repeat the first.
    SecondHalfMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a pattern matrix.
///
/// Checks:
/// 1. Even team count, `W = T - 1` weeks per row
/// 2. Mirror invariant
/// 3. Run-length rule on every full sequence
pub fn validate_pattern(pattern: &PatternMatrix, max_consecutive: usize) -> ValidationResult {
    let mut errors = Vec::new();
    let teams = pattern.team_count();

    if teams < 2 || teams % 2 != 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!("Team count must be even and >= 2, got {teams}"),
        ));
        return finish(errors);
    }
    for (team, half) in pattern.halves().iter().enumerate() {
        if half.len() != teams - 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("Team {} has {} weeks, expected {}", team + 1, half.len(), teams - 1),
            ));
        }
    }
    if !errors.is_empty() {
        return finish(errors);
    }

    let half_teams = teams / 2;
    for team in 0..half_teams {
        let partner = team + half_teams;
        if let Some(week) = (0..pattern.weeks())
            .find(|&w| pattern.half(team)[w] == pattern.half(partner)[w])
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::MirrorViolation,
                format!(
                    "Teams {} and {} share a venue in week {}",
                    team + 1,
                    partner + 1,
                    week + 1
                ),
            ));
        }
    }

    for team in 0..teams {
        if !pattern.team_is_valid(team, max_consecutive) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RunTooLong,
                format!(
                    "Team {} plays more than {max_consecutive} consecutive games at one venue",
                    team + 1
                ),
            ));
        }
    }

    finish(errors)
}

/// Validates a timetable against the pattern it was resolved from.
pub fn validate_timetable(pattern: &PatternMatrix, timetable: &Timetable) -> ValidationResult {
    let mut errors = Vec::new();
    let teams = pattern.team_count();
    let weeks = pattern.weeks();

    if timetable.team_count() != teams
        || timetable.rows().iter().any(|r| r.len() != 2 * weeks)
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!(
                "Expected {teams} teams x {} weeks, got {} teams",
                2 * weeks,
                timetable.team_count()
            ),
        ));
        return finish(errors);
    }

    let mut meetings = vec![0usize; teams * teams];

    for week in 0..2 * weeks {
        for team in 0..teams {
            let opponent = timetable.opponent(team, week);
            if opponent >= teams {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownOpponent,
                    format!(
                        "Team {} has unknown opponent {} in week {}",
                        team + 1,
                        opponent + 1,
                        week + 1
                    ),
                ));
                continue;
            }
            if opponent == team {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfMatch,
                    format!("Team {} plays itself in week {}", team + 1, week + 1),
                ));
                continue;
            }
            if timetable.opponent(opponent, week) != team {
                errors.push(ValidationError::new(
                    ValidationErrorKind::AsymmetricPairing,
                    format!(
                        "Team {} plays {} in week {}, but not vice versa",
                        team + 1,
                        opponent + 1,
                        week + 1
                    ),
                ));
                continue;
            }
            if team < opponent && pattern.venue(team, week) == pattern.venue(opponent, week) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::VenueConflict,
                    format!(
                        "Teams {} and {} share a venue in week {}",
                        team + 1,
                        opponent + 1,
                        week + 1
                    ),
                ));
            }
            if week < weeks && team < opponent {
                meetings[team * teams + opponent] += 1;
            }
            if week >= weeks && timetable.opponent(team, week - weeks) != opponent {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SecondHalfMismatch,
                    format!(
                        "Team {} week {} does not repeat week {}",
                        team + 1,
                        week + 1,
                        week - weeks + 1
                    ),
                ));
            }
        }
    }

    for a in 0..teams {
        for b in (a + 1)..teams {
            match meetings[a * teams + b] {
                1 => {}
                0 => errors.push(ValidationError::new(
                    ValidationErrorKind::MissingPairing,
                    format!("Teams {} and {} never meet", a + 1, b + 1),
                )),
                n => errors.push(ValidationError::new(
                    ValidationErrorKind::RepeatedPairing,
                    format!("Teams {} and {} meet {n} times in the first half", a + 1, b + 1),
                )),
            }
        }
    }

    finish(errors)
}
