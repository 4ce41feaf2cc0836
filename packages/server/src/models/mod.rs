pub mod answer;
pub mod auth;
pub mod leaderboard;
pub mod progress;
pub mod project;
pub mod resource;
pub mod shared;
pub mod submission;
