pub mod forms;
pub mod helpers;
pub mod responses;
pub mod symbols;
pub mod tables;
