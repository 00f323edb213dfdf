//! Browser backend, compiled for `wasm32` with the `web` feature.
//!
//! [`WebDom`] implements [`Dom`](crate::Dom) over the live document,
//! [`LocalStorage`] and [`MediaQueryScheme`] supply the flag and the OS
//! scheme, and [`install`] wires them to page events.
//!
//! ```ignore
//! let config = nocturne::ThemeConfig::default();
//! let _installation = nocturne::web::install(config);
//! ```

mod dom;
mod install;
mod storage;

pub use dom::WebDom;
pub use install::{install, Installation, WebReconciler};
pub use storage::{LocalStorage, MediaQueryScheme, DARK_SCHEME_QUERY};
