pub mod actions;
pub mod events;
pub mod orchestration;
pub mod store;
