//! The shape of the input records.
//!
//! Collection never deserializes whole records; these types describe the
//! format and are handy for producing input files.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Developer {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub title: String,
    pub developer: Developer,
    pub year_released: i32,
    /// Multiple genres are separated by `", "`.
    pub genre: String,
}
