use serde::Serialize;

#[derive(Serialize)]
pub struct LeaderboardEntry {
    /// 1-based rank; ties broken by username so ordering is deterministic.
    pub rank: usize,
    pub student_id: i32,
    pub username: String,
    pub full_name: String,
    pub total_points: i64,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Set only when the caller is a student on the board.
    pub current_user_rank: Option<usize>,
    pub current_user_points: Option<i64>,
}
