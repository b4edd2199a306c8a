pub mod cv;
pub mod params;
