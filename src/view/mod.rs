//! Edit models behind the dashboard's table and urgent-issue views

pub mod table;
pub mod urgent;

pub use table::{EditState, EditableTable};
pub use urgent::UrgentIssues;
