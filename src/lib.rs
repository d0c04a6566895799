//! TMS tile pyramid lookup: geometry primitives in [`geo`], tile maps and their registry in [`tms`].

pub use geo;
pub use tms;
