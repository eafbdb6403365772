use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_MAX_RATING: u8 = 10;

/// A rating given by the user, always within 1..=max of the input that produced it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct UserRating(u8);

impl UserRating {
    pub(crate) fn from_raw(value: u8) -> Self {
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for UserRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating {value} is out of range (1-{max})")]
    OutOfRange { value: u32, max: u8 },
}

/// Star-style rating input. Stateless: it only validates what the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingInput {
    max_rating: u8,
}

impl RatingInput {
    pub fn new(max_rating: u8) -> Self {
        Self {
            max_rating: max_rating.max(1),
        }
    }

    pub fn max_rating(&self) -> u8 {
        self.max_rating
    }

    pub fn rate(&self, value: u32) -> Result<UserRating, RatingError> {
        if value == 0 || value > u32::from(self.max_rating) {
            return Err(RatingError::OutOfRange {
                value,
                max: self.max_rating,
            });
        }
        Ok(UserRating(value as u8))
    }

    /// Every rating this input can produce, lowest first.
    pub fn choices(&self) -> impl Iterator<Item = UserRating> {
        (1..=self.max_rating).map(UserRating)
    }
}

impl Default for RatingInput {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RATING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_accepts_bounds() {
        let input = RatingInput::default();
        assert_eq!(input.rate(1).unwrap().value(), 1);
        assert_eq!(input.rate(10).unwrap().value(), 10);
    }

    #[test]
    fn test_rate_rejects_out_of_range() {
        let input = RatingInput::new(5);
        assert_eq!(input.rate(0), Err(RatingError::OutOfRange { value: 0, max: 5 }));
        assert_eq!(input.rate(6), Err(RatingError::OutOfRange { value: 6, max: 5 }));
    }

    #[test]
    fn test_choices_cover_full_scale() {
        let values: Vec<u8> = RatingInput::new(3).choices().map(UserRating::value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
