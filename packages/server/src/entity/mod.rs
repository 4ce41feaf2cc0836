pub mod project;
pub mod project_progress;
pub mod project_step;
pub mod resource;
pub mod step_answer;
pub mod step_question;
pub mod submission;
pub mod user;
