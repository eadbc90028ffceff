pub mod chart_service;
pub mod series_service;
pub mod visualize_service;
