pub mod browser;
pub mod cards;

pub use browser::{DirectoryBrowser, RenderOutcome};
