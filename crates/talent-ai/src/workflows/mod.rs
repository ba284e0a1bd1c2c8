pub mod intake;
pub mod mandates;
