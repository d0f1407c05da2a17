pub mod errors;
pub mod limit;
pub mod parse;
