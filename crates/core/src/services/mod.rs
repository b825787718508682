pub mod market_service;
pub mod portfolio_service;
