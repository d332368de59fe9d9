pub(crate) mod dcel;
pub(crate) mod dcel_operations;
mod handles;
pub(crate) mod locate;
mod orientation;

pub mod math;
pub mod rand_generator;

pub use dcel::Dcel;
pub use orientation::Orientation;

pub use handles::iterators;
pub use handles::*;

pub use dcel_operations::BOUNDING_OFFSET;
pub use locate::{PositionInMesh, WALK_ITERATION_LIMIT, WALK_WARNING_THRESHOLD};
pub use rand_generator::RandGenerator;
