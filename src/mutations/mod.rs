//! Pure collection transforms.
//!
//! Every operation takes the current collection and returns a new one.
//! Nothing is edited in place, so a snapshot handed out earlier never
//! changes underneath its reader.

mod crud;
mod ids;

pub use crud::{add_many, add_one, delete_one, update_one};
pub use ids::IdAllocator;
