pub mod company_info;
pub mod holding;
pub mod portfolio;
pub mod quote;
pub mod report;
pub mod settings;
