pub mod alerts;
pub mod power_data;
