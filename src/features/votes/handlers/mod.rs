pub mod vote_handler;

pub use vote_handler::{__path_cast_vote, __path_remove_vote, cast_vote, remove_vote};
