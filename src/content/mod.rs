pub(crate) mod gift;
pub(crate) mod guest;
pub(crate) mod model;
