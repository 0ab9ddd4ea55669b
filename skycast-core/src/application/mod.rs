pub mod a2ui;
pub mod agent;
pub mod confirmation;
pub mod dispatch;
pub mod generation;
