pub mod artifacts;
pub mod background;
pub mod batch;
pub mod config;
pub mod engine;
pub mod err;
pub mod placement;
pub mod poller;
pub mod resumption;
pub mod status;
pub mod tool;
