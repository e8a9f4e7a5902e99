pub mod demand;
pub mod models;
pub mod pricing;
