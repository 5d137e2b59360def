pub mod catalog;
pub mod classifier;
pub mod clock;
pub mod errors;
pub mod questionnaire_session;
pub mod scoring;
pub mod session_store;
pub mod timer_recorder;
