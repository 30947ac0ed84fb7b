pub mod base;
pub mod google;
pub mod openai;
