pub mod data;
pub mod page;
pub mod view;
