//! Hover-driven viewport engine for interactive SVG maps.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It loads an
//! SVG map inline, frames it, and zooms toward the region under the pointer
//! (or under keyboard focus, or named by an external trigger), with a parallax
//! drift while idle and an underline under the active region's label.
//! Decorative wave tiles drift on the same frame clock. All
//! state lives in [`engine::EngineCore`], which reads geometry through the
//! [`host::SceneHost`] trait and returns [`engine::Action`]s, so it runs
//! under plain `cargo test` without a browser. [`dom`] is the `web-sys`
//! binding that applies those actions to the page.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`] set |
//! | [`hover`] | Region switch guards, forgiveness and the reset timer |
//! | [`frame`] | Idle and hover frame computation |
//! | [`transform`] | Layer transform and the single-owner tween slot |
//! | [`tween`] | Easing curves, tween progress and the lag-smoothed frame clock |
//! | [`parallax`] | Idle drift and float |
//! | [`waves`] | Wave tile drift, lanes and edge fades |
//! | [`label`] | Label matching and underline geometry |
//! | [`region`] | Region directory and per-region tuning rules |
//! | [`catalog`] | Destination catalogue (label names, paths, aliases) |
//! | [`geom`] | Points, rects, view boxes, affine matrices and pan clamping |
//! | [`host`] | The read-only [`host::SceneHost`] capability trait |
//! | [`input`] | Pointer samples, keys and activation targets |
//! | [`config`] | Init options and tuning (serde) |
//! | [`error`] | [`error::InitError`] |
//! | [`consts`] | Default numbers behind [`config::Tuning`] |
//! | [`dom`] | Browser binding and `init_map` |
//! | [`loader`] | Fetching and mounting the SVG document |

pub mod catalog;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod error;
pub mod frame;
pub mod geom;
pub mod host;
pub mod hover;
pub mod input;
pub mod label;
pub mod loader;
pub mod parallax;
pub mod region;
pub mod transform;
pub mod tween;
pub mod waves;
