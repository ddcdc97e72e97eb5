//! `dailyboard-report` - daily report board engine.
//!
//! Pure engine crate: receives pre-loaded sheet grids, returns the combined
//! board and its HTML rendering. No CLI or file IO dependencies.

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod grid;
pub mod locate;
pub mod model;
pub mod order;
pub mod render;
pub mod table;

pub use config::Layout;
pub use engine::{extract_team, run, RunOptions};
pub use error::LayoutError;
pub use grid::Grid;
pub use table::{section_tables, SectionTable};
pub use model::{AttendanceRecord, Board, PlanRecord, SectionKind, TeamInput, TeamReport, WorkRecord};
