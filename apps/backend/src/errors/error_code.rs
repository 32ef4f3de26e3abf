//! Error codes for the blackjack backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses and WebSocket error frames.

use core::fmt;

/// Centralized error codes for the blackjack backend API.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Invalid wager amount
    InvalidWager,
    /// Wager exceeds available funds
    InsufficientFunds,
    /// Command arrived in the wrong room phase
    PhaseMismatch,
    /// Command from a seat that does not hold the turn
    OutOfTurn,
    /// Unknown automation difficulty
    InvalidDifficulty,

    // Resource not found
    /// Room not found
    RoomNotFound,
    /// Seat not found
    SeatNotFound,
    /// General not found error
    NotFound,

    // Business logic conflicts
    /// Room is at capacity
    RoomFull,
    /// Seat already bound to a live connection
    SeatTaken,
    /// Target seat is not an automated seat
    NotAutomated,
    /// General conflict
    Conflict,

    // Internal
    /// Round invariant violated; round was force-settled
    InvariantViolation,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The canonical wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidWager => "INVALID_WAGER",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::InvalidDifficulty => "INVALID_DIFFICULTY",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::SeatNotFound => "SEAT_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RoomFull => "ROOM_FULL",
            ErrorCode::SeatTaken => "SEAT_TAKEN",
            ErrorCode::NotAutomated => "NOT_AUTOMATED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvariantViolation => "INVARIANT_VIOLATION",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        let codes = [
            ErrorCode::ValidationError,
            ErrorCode::PhaseMismatch,
            ErrorCode::OutOfTurn,
            ErrorCode::RoomNotFound,
            ErrorCode::RoomFull,
            ErrorCode::InvariantViolation,
        ];
        for code in codes {
            let s = code.as_str();
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "{s} is not SCREAMING_SNAKE_CASE"
            );
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ErrorCode::OutOfTurn.to_string(), "OUT_OF_TURN");
        assert_eq!(ErrorCode::InsufficientFunds.to_string(), "INSUFFICIENT_FUNDS");
    }
}
