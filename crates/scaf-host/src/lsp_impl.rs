pub(crate) mod active_initialized;
pub(crate) mod active_uninitialized;
pub(crate) mod initializing;
pub(crate) mod shutting_down;
pub(crate) mod state;
pub(crate) mod stopped;
