use std::fmt;

/// Scalar type stored in the tables.
pub type Value = f32;

/// Expected-score statistics `(min, avg, max)` for one node.
///
/// A NaN `avg` is the "no data" sentinel: the node was never computed, or the
/// query fell outside the tables. Check [`Answer::is_none`] (or use
/// [`Answer::get`]) before reading the fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Answer {
    pub min: Value,
    pub avg: Value,
    pub max: Value,
}

impl Answer {
    /// The "no data" sentinel.
    pub const NONE: Answer = Answer { min: Value::NAN, avg: Value::NAN, max: Value::NAN };

    /// Value of a terminal (stuck) position.
    pub const ZERO: Answer = Answer { min: 0.0, avg: 0.0, max: 0.0 };

    #[inline]
    pub fn new(min: Value, avg: Value, max: Value) -> Self { Answer { min, avg, max } }

    #[inline]
    pub fn is_none(&self) -> bool { self.avg.is_nan() }

    /// `Some(self)` unless this is the sentinel.
    #[inline]
    pub fn get(self) -> Option<Answer> { (!self.is_none()).then_some(self) }

    /// Add an immediate reward to every component.
    #[inline]
    pub fn shifted(self, reward: Value) -> Answer {
        Answer { min: self.min + reward, avg: self.avg + reward, max: self.max + reward }
    }
}

impl Default for Answer {
    fn default() -> Self { Answer::NONE }
}

/// `min avg max`, or `-1` for the sentinel.
impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("-1")
        } else {
            write!(f, "{} {} {}", self.min, self.avg, self.max)
        }
    }
}
