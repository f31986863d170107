pub mod account_generator;
pub mod analysis;
pub mod asset_tag_generator;
pub mod charts;
pub mod churn;
pub mod config;
pub mod error;
pub mod fake_data;
pub mod generator;
pub mod rng;
pub mod service_point_generator;
pub mod store;
pub mod transaction_generator;
pub mod types;
pub mod user_generator;
pub mod vehicle_generator;
