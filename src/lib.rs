pub mod agent;
pub mod analysis;
pub mod backend;
pub mod classifier;
pub mod context;
pub mod conversation;
pub mod dispatcher;
pub mod errors;
pub mod format;
pub mod gateway;
pub mod params;
pub mod prompt;
pub mod providers;
pub mod scheduling;
pub mod session;
pub mod settings;
