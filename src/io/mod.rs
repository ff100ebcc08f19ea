//! Reading seed configurations and writing the final image.

pub mod csv;
pub mod png;

pub use self::csv::{parse_grid, read_grid};
pub use self::png::{palette, render, write_png};
