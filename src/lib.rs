pub mod attribute;
pub mod collector;
pub mod driver;
pub mod errors;
mod parallelism;
pub mod parse;
pub mod record;
pub mod reporter;
pub mod tally;
