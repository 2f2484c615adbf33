pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("tetrimino kind {kind} registered twice")]
    DuplicateKind { kind: TetriminoKind },
    #[display("tetrimino kind {kind} missing from the catalog")]
    MissingKind { kind: TetriminoKind },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("base step must be longer than zero")]
    ZeroBaseStep,
    #[display("speed decay must be within (0, 1), got {decay}")]
    DecayOutOfRange { decay: f64 },
    #[display("countdown must not be negative, got {secs}")]
    NegativeCountdown { secs: i64 },
    #[display("steps per piece must be at least one")]
    ZeroStepsPerPiece,
}
