//! Building blocks for the browser driven end-to-end suite.
//!
//! The step definitions in the runner binary stay thin: they resolve a [`page::Page`] from the
//! scenario world and hand it to the helpers in here. The one piece with real logic is
//! [`table::ToolbarTable`], which verifies pagination and sort order of a PatternFly toolbar
//! table across all of its pages.

pub mod error;
pub mod page;
pub mod search;
pub mod table;
pub mod wait;

pub use error::{DriverError, Error};
