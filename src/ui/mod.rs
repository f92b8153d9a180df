//! Presentation state for the storefront views.
//!
//! Nothing here draws anything: each type keeps the state a view renders and
//! turns user actions into store calls, reporting failures as notices.

mod auth_panel;
mod cart_panel;
mod catalog_view;
mod notice;

pub use auth_panel::*;
pub use cart_panel::*;
pub use catalog_view::*;
pub use notice::*;
