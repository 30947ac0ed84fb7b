pub mod message;
pub mod objectid;
