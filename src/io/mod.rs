pub mod csv;
pub mod sil;
