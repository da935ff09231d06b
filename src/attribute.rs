//! The attributes that can be tallied.

use crate::errors::{BoxedError, invalid_attribute};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    /// Nested: the `name` of the record's `developer` object.
    Developer,
    YearReleased,
    Genre,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [
        Attribute::Developer,
        Attribute::YearReleased,
        Attribute::Genre,
    ];

    /// The field name as it appears in the records.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::Developer => "developer",
            Attribute::YearReleased => "yearReleased",
            Attribute::Genre => "genre",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Attribute {
    type Err = BoxedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Attribute::ALL.iter().find(|a| a.key() == s) {
            Some(&a) => Ok(a),
            None => Err(invalid_attribute(format!(
                "attribute {s} does not exist; available fields are: {}",
                Attribute::ALL.iter().map(|a| a.key()).join(", ")
            ))),
        }
    }
}
