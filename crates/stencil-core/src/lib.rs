//! Stencil Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Stencil
//! renderer. It includes:
//!
//! - **Coordinates**: Fixed-point design units ([`coord::Coord`], [`coord::CoordPoint`], [`coord::CoordRect`])
//! - **Geometry**: Screen-space points, sizes and bounds ([`geometry`] module)
//! - **Colors**: 32-bit ARGB colors with CSS parsing ([`color::Color`])
//! - **Layers**: PCB layer ids and the default color / draw priority table ([`layer`] module)
//! - **Overline**: Backslash overline markup parsing ([`overline::OverlineHelper`])
//! - **Draw**: Stroke and text style values used by the drawing contract ([`draw`] module)
//! - **Model**: Schematic and PCB library components ([`model`] module)

pub mod color;
pub mod coord;
pub mod draw;
pub mod geometry;
pub mod layer;
pub mod model;
pub mod overline;
