pub mod calculation;
pub mod chart;
pub mod price;
pub mod price_table;
pub mod settings;
