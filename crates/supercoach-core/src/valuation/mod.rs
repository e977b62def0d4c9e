pub mod rating;
pub mod scarcity;
pub mod vorp;
