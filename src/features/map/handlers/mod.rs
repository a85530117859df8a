pub mod map_handler;

pub use map_handler::{__path_get_options, __path_list_markers, get_options, list_markers};
