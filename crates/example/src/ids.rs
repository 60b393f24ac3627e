//! Identifier wrappers.
//!
//! Names ending in `Id` get neither arithmetic nor ordering operators unless
//! they ask for them.

use wrapper_value_object_derive::wrapper_value_object;

/// Random product identifier backed by a `uuid::Uuid`.
#[wrapper_value_object]
#[derive(Clone, Copy)]
pub struct ProductId;

/// Identifier of a league.
#[wrapper_value_object(i32)]
#[derive(Clone, Copy)]
pub struct LeagueId;

/// Identifier of a match, convertible back into a plain `i32`.
#[wrapper_value_object(i32, GenerateImplicitConversionToPrimitive = true)]
#[derive(Clone, Copy)]
pub struct MatchId;

/// Score identifier that opts back into the numeric operators.
#[wrapper_value_object(i32, GenerateMathOperators = True, GenerateComparisonOperators = True)]
#[derive(Clone, Copy)]
pub struct ScoreId;

// Identifier-like storage never gets operators, whatever the options say.
#[wrapper_value_object(GenerateMathOperators = True, GenerateComparisonOperators = TriBool::True)]
#[derive(Clone, Copy)]
pub struct SessionKey;
