pub mod marketplace_standard;

pub use marketplace_standard::MarketplaceStandardParser;
