pub mod generate;
pub mod query;
pub mod redeem;
pub mod stats;
