pub mod category;
pub mod filter;
pub mod items;
pub mod mapping;
pub mod units;
