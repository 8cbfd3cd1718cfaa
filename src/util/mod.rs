//! Small pure helpers shared by the panes.

pub mod body;
