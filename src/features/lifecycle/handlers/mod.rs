pub mod lifecycle_handler;

pub use lifecycle_handler::{__path_get_meta, get_meta};
