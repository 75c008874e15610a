pub mod calculation_view;
pub mod traits;
