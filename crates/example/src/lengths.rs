//! Length units. Conversions between them are written by hand next to the
//! generated members.

use wrapper_value_object_derive::wrapper_value_object;

const CENTIMETERS_PER_METER: f64 = 100.0;

#[wrapper_value_object(f64)]
#[derive(Clone, Copy)]
pub struct MeterLength;

#[wrapper_value_object(f64)]
#[derive(Clone, Copy)]
pub struct CentimeterLength;

impl From<CentimeterLength> for MeterLength {
    fn from(length: CentimeterLength) -> Self {
        Self::new(length.value() / CENTIMETERS_PER_METER)
    }
}

impl From<MeterLength> for CentimeterLength {
    fn from(length: MeterLength) -> Self {
        Self::new(length.value() * CENTIMETERS_PER_METER)
    }
}
