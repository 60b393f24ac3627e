use std::fmt;

use wrapper_value_object_derive::wrapper_value_object;

/// A tag shown to users. Not `Copy`, so accessors borrow.
#[wrapper_value_object(String)]
#[derive(Clone)]
pub struct Label;

impl Label {
    pub fn is_empty(&self) -> bool {
        self.value().is_empty()
    }
}

// Replaces the generated `Display`.
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.value)
    }
}
