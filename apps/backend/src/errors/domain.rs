//! Domain-level error type used across the game services.
//!
//! This error type is HTTP- and transport-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.
//!
//! A `DomainError` returned by a table operation means the command was
//! rejected before any mutation: room state is unchanged and nothing is
//! broadcast.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Domain-level not found entities (minimal set; extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Seat,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(String),
    /// Command arrived while the room was in the wrong phase
    Phase(String),
    /// Command from a seat that does not currently hold the turn
    OutOfTurn(String),
    /// Wager exceeds the seat's available funds
    InsufficientFunds(String),
    /// Room has no free seats
    RoomFull(String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// A table invariant was violated; the round has been force-settled
    Invariant(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Phase(d) => write!(f, "phase mismatch: {d}"),
            DomainError::OutOfTurn(d) => write!(f, "out of turn: {d}"),
            DomainError::InsufficientFunds(d) => write!(f, "insufficient funds: {d}"),
            DomainError::RoomFull(d) => write!(f, "room full: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Invariant(d) => write!(f, "invariant violation: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn phase(detail: impl Into<String>) -> Self {
        Self::Phase(detail.into())
    }
    pub fn out_of_turn(detail: impl Into<String>) -> Self {
        Self::OutOfTurn(detail.into())
    }
    pub fn insufficient_funds(detail: impl Into<String>) -> Self {
        Self::InsufficientFunds(detail.into())
    }
    pub fn room_full(detail: impl Into<String>) -> Self {
        Self::RoomFull(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }
}
