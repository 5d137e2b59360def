pub mod insights_routes;
pub mod questionnaire_routes;
pub mod timer_routes;
