pub mod asset;
pub mod prediction;
pub mod requests;
