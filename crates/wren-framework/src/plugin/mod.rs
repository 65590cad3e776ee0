//! Plugin system for the Wren framework.
//!
//! # Architecture
//!
//! A plugin is an ordered list of exports, its [`PluginManifest`]. Each export
//! is either a callable handler carrying raw metadata ([`RawHandler`]) or a
//! plain value the scanner ignores.
//!
//! A [`PluginDescriptor`] is the *static, `Copy` handle* to a plugin; it
//! carries only metadata and a function pointer that builds a fresh manifest.
//! The runtime calls [`PluginDescriptor::manifest`] and hands the result to
//! [`scan`](crate::scanner::scan).
//!
//! # Quick start
//!
//! ```rust,ignore
//! use wren::prelude::*;
//!
//! fn ping() -> &'static str { "pong" }
//!
//! pub static PING: PluginDescriptor = define_plugin! {
//!     name: "ping",
//!     items: [handler("ping").command("ping").callable(ping as fn() -> &'static str)],
//! };
//! ```
//!
//! [`RawHandler`]: wren_core::RawHandler

pub mod builder;
mod descriptor;
mod macros;
mod manifest;

pub use builder::{HandlerBuilder, handler, shutdown, value};
pub use descriptor::{PluginDescriptor, PluginMetadata, WREN_PLUGIN_API_VERSION};
pub use manifest::{PluginItem, PluginManifest};
