use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::{Class, Student};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(default = "default_grade_level", alias = "gradeLevel")]
    #[validate(length(min = 1, message = "grade_level must not be empty"))]
    pub(crate) grade_level: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) grade_level: String,
}

impl ClassResponse {
    pub(crate) fn from_db(class: Class) -> Self {
        Self { id: class.id, name: class.name, grade_level: class.grade_level }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(alias = "rollNumber")]
    #[validate(length(min = 1, message = "roll_number must not be empty"))]
    pub(crate) roll_number: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) roll_number: String,
    pub(crate) class_id: i64,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            roll_number: student.roll_number,
            class_id: student.class_id,
        }
    }
}

fn default_grade_level() -> String {
    "High School".to_string()
}
