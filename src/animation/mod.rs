pub(crate) mod ease;
pub(crate) mod policy;
pub mod presets;
pub(crate) mod variants;
