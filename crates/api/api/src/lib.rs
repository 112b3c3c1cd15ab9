pub mod case;
pub mod inbox;
pub mod workflow;
