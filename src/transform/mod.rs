//! Geometric warps. Each returns a new buffer, possibly of a different size.

mod rotate;
mod twirl;
mod zoom;

pub use rotate::{rotate, DEFAULT_BACKGROUND};
pub use twirl::twirl;
pub use zoom::{zoom, DEFAULT_MAX_ZOOM_EXTENT};
