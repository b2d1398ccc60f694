pub mod answer;
pub mod question_set;
pub mod user;
