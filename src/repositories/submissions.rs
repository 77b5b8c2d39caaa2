mod commands;
mod queries;
mod types;


pub(crate) use commands::{publish_results, register_upload, save_graded, set_teacher_feedback};
pub(crate) use queries::{find_by_pair, find_student_result, list_roster, student_results};
pub(crate) use types::{RosterRow, SaveGraded, StudentResultRow};
