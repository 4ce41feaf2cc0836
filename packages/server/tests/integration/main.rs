mod answers;
mod common;
mod leaderboard;
mod progress;
mod review;
mod run;
