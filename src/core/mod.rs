pub(crate) mod bucket;
pub(crate) mod constants;
pub(crate) mod hasher;
pub(crate) mod locking;
pub(crate) mod table;
