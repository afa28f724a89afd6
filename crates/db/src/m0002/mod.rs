mod feedback;
mod question;
mod question_reply;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "lectern",
    "m0002",
    vec_box![],
    vec_box![
        feedback::CreateTable,
        feedback::CreateUk1,
        feedback::CreateIdx1,
        question::CreateTable,
        question::CreateIdx1,
        question::CreateIdx2,
        question_reply::CreateTable,
        question_reply::CreateIdx1
    ]
);
