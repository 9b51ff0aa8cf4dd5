pub mod catalog;
pub mod comparison;
