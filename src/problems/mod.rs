//! Ready-made constraint models.

pub mod rostering;
