pub mod filter;
pub mod jobs;
mod state;

pub use jobs::LoadEvent;
pub use state::{ActivityState, App, Focus, IndexState, InputMode, View};
