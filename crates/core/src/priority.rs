//! Scheduling priority classes.

use crate::InferenceRequest;
use serde::{Deserialize, Serialize};

/// Priority class handed to the scheduling platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityClass {
    Lower,
    Normal,
    Higher,
    Immediate,
}

impl From<u8> for PriorityClass {
    fn from(value: u8) -> Self {
        classify_priority(value)
    }
}

/// Map a raw 0 to 255 priority onto a [`PriorityClass`].
///
/// Below 128 is `Lower`, exactly 128 is `Normal`, 255 is `Immediate`, and 129 to 254 is
/// `Higher`.
pub fn classify_priority(priority: u8) -> PriorityClass {
    match priority {
        0..=127 => PriorityClass::Lower,
        128 => PriorityClass::Normal,
        255 => PriorityClass::Immediate,
        _ => PriorityClass::Higher,
    }
}

pub fn priority_class(request: &InferenceRequest) -> PriorityClass {
    classify_priority(request.priority)
}
