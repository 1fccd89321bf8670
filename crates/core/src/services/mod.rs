pub mod portfolio_service;
pub mod quote_service;
