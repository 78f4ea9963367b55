pub mod line_item;
pub mod package;
pub mod promotion;
pub mod schedule;
