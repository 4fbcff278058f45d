pub mod sixdof;
pub mod state;

pub use sixdof::derivatives;
