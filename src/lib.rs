//! Flat-pattern reconstruction for sheet-metal solids.
//!
//! [`sheet`] finds the constant-thickness shell of a solid, arranges its
//! faces into a bend hierarchy and straightens every bend. It talks to the
//! B-rep through [`kernel::GeometryKernel`], implemented here by the
//! slotmap-backed [`topology::TopologyStore`].

pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod operations;
pub mod sheet;
pub mod topology;

pub use error::{Error, Result};
