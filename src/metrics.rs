use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Float with a total order, used to key series points by their x value.
#[derive(PartialOrd, Deserialize, Serialize, Clone, Copy)]
pub struct F64(f64);

impl F64 {
    pub fn new(x: f64) -> Self {
        Self(x)
    }

    pub fn nan() -> Self {
        Self::new(f64::NAN)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

// based on: https://github.com/reem/rust-ordered-float/ `cmp` implementation for `OrderedFloat`
impl Ord for F64 {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.partial_cmp(other) {
            Some(ordering) => ordering,
            None => {
                if self.0.is_nan() {
                    if other.0.is_nan() {
                        Ordering::Equal
                    } else {
                        Ordering::Greater
                    }
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

impl PartialEq for F64 {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() {
            other.0.is_nan()
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for F64 {}

impl fmt::Debug for F64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
