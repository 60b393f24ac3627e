//! Example crate demonstrating wrapper-value-object-codegen usage.
//!
//! Each struct below is declared with `#[wrapper_value_object(..)]`. The
//! attribute adds the storage field; `build.rs` runs `CodeGenerator` over
//! `src/` and writes the members every struct includes from `OUT_DIR`.

pub mod fixtures;
pub mod ids;
pub mod lengths;
pub mod money;
pub mod scores;
pub mod text;

/// Option type and option names shared by every wrapper in this crate.
pub mod options {
    include!(concat!(env!("OUT_DIR"), "/wrapper_value_object_options.rs"));
}

pub use fixtures::{Fixture, MatchResult};
pub use ids::{LeagueId, MatchId, ProductId, ScoreId, SessionKey};
pub use lengths::{CentimeterLength, MeterLength};
pub use money::{Money, PositiveAmount, ValidationError};
pub use scores::{Percentage, Probability, RangeError, Score, ScoreRange};
pub use text::Label;
