pub mod group;
pub mod list;
pub mod recurrence;
pub mod task;

pub use group::*;
pub use list::*;
pub use recurrence::*;
pub use task::*;
