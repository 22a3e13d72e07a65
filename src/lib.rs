//! Dynamic-height bottom sheets for terminal apps.
//!
//! Everything lives in the `sheet` crate and is re-exported here. Run the
//! demo with `cargo run --example dynamic_sheet`.

pub use ::sheet::*;
