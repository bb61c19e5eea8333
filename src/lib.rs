//! Drawing tools for time/price charts.
//!
//! This crate is compiled to WebAssembly and runs in the browser beside a
//! host charting library. It owns the annotation layer: tools anchored in
//! chart space (bar index + price), their per-frame pixel layout, hit-testing
//! and drag editing, rendering, and bar-by-bar alert evaluation. The host
//! supplies scale transforms through [`coords::ChartHost`] and a drawing
//! surface; it persists the resulting [`engine::Action`]s itself.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Pixel-space points, lines, boxes, clipping, containment |
//! | [`coords`] | Logical/pixel conversion and the host scale trait |
//! | [`options`] | Per-tool style record with typed accessors |
//! | [`tool`] | The [`tool::Tool`] primitive and hit results |
//! | [`catalog`] | Per-family layout, hit priority, drag policy, drawing |
//! | [`alert`] | Crossing and zone alerts against price bars |
//! | [`store`] | Registry of attached tools, draw order, batch alerts |
//! | [`engine`] | Pointer-driven drag sessions and testable [`engine::EngineCore`] |
//! | [`input`] | Input event types and the drag state machine |
//! | [`render`] | [`render::Surface`] trait and shared draw helpers |
//! | [`canvas2d`] | `Surface` for the browser 2D canvas |
//! | [`recording`] | `Surface` that records commands |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (hit radii, text metrics, tolerances) |

pub mod alert;
pub mod canvas2d;
pub mod catalog;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod options;
pub mod recording;
pub mod render;
pub mod store;
pub mod tool;
