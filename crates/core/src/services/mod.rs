pub mod calculation_service;
pub mod chart_service;
