use wrapper_value_object_derive::wrapper_value_object;

/// Goals or points. Arithmetic on `u8` storage yields a plain `i32`.
#[wrapper_value_object(u8)]
#[derive(Clone, Copy)]
pub struct Score;

/// A probability in `[0, 1]`; adding two of them has no meaning.
#[wrapper_value_object(f64, generate_math_operators = false)]
#[derive(Clone, Copy)]
pub struct Probability;

impl Probability {
    pub const CERTAIN: f64 = 1.0;

    pub fn complement(self) -> Self {
        Self::new(Self::CERTAIN - self.value())
    }
}

/// Whole percentage. Out-of-range values are a programming error.
#[wrapper_value_object(u8)]
#[derive(Clone, Copy)]
pub struct Percentage;

impl Percentage {
    fn validate(value: &u8) {
        assert!(*value <= 100, "percentage out of range: {value}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range is inverted: lowest {lowest} is above highest {highest}")]
    Inverted { lowest: i32, highest: i32 },
}

/// Inclusive band of scores used to bucket results.
#[wrapper_value_object("Lowest", i32, "Highest", i32)]
#[derive(Clone, Copy)]
pub struct ScoreRange;

impl ScoreRange {
    fn validate(lowest: &i32, highest: &i32) -> Result<(), RangeError> {
        if lowest > highest {
            return Err(RangeError::Inverted {
                lowest: *lowest,
                highest: *highest,
            });
        }
        Ok(())
    }

    pub fn contains(&self, score: i32) -> bool {
        (self.lowest()..=self.highest()).contains(&score)
    }
}
