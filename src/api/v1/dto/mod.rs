pub mod greeting;
pub mod me;
