mod project_create_created_at_idx;
mod project_create_table;
mod project_member_create_table;
mod task_create_assigned_to_idx;
mod task_create_filter_idx;
mod task_create_table;
mod user_create_table;
mod user_create_username_idx;
mod user_profile_create_table;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "nikjin",
    "m0_1",
    vec_box![],
    vec_box![
        user_create_table::Operation,
        user_create_username_idx::Operation,
        user_profile_create_table::Operation,
        project_create_table::Operation,
        project_create_created_at_idx::Operation,
        project_member_create_table::Operation,
        task_create_table::Operation,
        task_create_assigned_to_idx::Operation,
        task_create_filter_idx::Operation
    ]
);
