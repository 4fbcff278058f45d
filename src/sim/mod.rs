pub mod dopri;
pub mod runner;
