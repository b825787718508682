pub mod aggregates;
pub mod asset;
pub mod favorites;
pub mod holding;
pub mod state;
