//! UI-facing binding layer over `wikimem_core`.

pub mod api;
