pub(crate) mod scheduler;
pub(crate) mod sink;
pub(crate) mod stats;
pub(crate) mod tick;
