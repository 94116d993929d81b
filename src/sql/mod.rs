//! Safe SQL builder: identifiers from entity field lists only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
