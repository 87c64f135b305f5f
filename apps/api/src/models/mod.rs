pub mod area;
pub mod profile;
