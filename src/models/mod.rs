pub mod questionnaire;
pub mod timer_session;
