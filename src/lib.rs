pub mod batch;
pub mod copy;
pub mod dedup;
pub mod metadata;
pub mod naming;
pub mod scan;
