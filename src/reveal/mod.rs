pub(crate) mod node;
pub(crate) mod timer;
pub(crate) mod tree;
pub(crate) mod visibility;
