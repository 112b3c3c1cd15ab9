pub mod local_user;
pub mod notification;
pub mod procurement_case;
pub mod role;
pub mod step_instance;
pub mod workflow_definition;
pub mod workflow_instance;
