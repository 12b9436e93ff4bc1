use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A user-assigned rating on the 1-10 star scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct UserRating(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rating must be between 1 and 10, got {value}")]
pub struct InvalidRating {
    pub value: i64,
}

impl UserRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, InvalidRating> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRating { value: value as i64 })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for UserRating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserRating> for u8 {
    fn from(rating: UserRating) -> Self {
        rating.0
    }
}

impl std::str::FromStr for UserRating {
    type Err = InvalidRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| InvalidRating { value: 0 })?;
        u8::try_from(value)
            .map_err(|_| InvalidRating { value })
            .and_then(Self::new)
    }
}

impl fmt::Display for UserRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}
