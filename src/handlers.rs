pub mod auth;
pub mod agents;
pub mod leads;
