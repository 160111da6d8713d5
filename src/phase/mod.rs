pub(crate) mod choreography;
pub(crate) mod context;
pub(crate) mod machine;
pub(crate) mod registry;
