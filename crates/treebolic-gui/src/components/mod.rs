pub mod search_bar;
pub mod status_bar;
pub mod tooltip;
