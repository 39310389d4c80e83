pub mod aggregation;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod generator;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;
