pub(crate) mod config;
pub(crate) mod engine;
pub(crate) mod frame;
pub(crate) mod reduced;
