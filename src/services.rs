pub mod auth;
pub mod agents;
pub mod distribute;
pub mod leads;
pub mod parse;
