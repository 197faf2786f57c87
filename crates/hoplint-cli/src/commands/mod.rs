pub mod audit;
pub mod rules;
