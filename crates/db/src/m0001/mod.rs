mod community_post;
mod course;
mod registration;
mod user;
mod webinar;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "lectern",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        course::CreateTable,
        course::CreateIdx1,
        webinar::CreateTable,
        webinar::CreateIdx1,
        registration::CreateTable,
        registration::CreateIdx1,
        registration::CreateIdx2,
        community_post::CreateTable,
        community_post::CreateIdx1
    ]
);
