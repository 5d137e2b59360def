pub mod context;
pub mod error;
pub mod insights_handler;
pub mod questionnaire_handler;
pub mod timer_handler;
