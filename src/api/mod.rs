pub(crate) mod classes;
pub(crate) mod errors;
pub(crate) mod exams;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod helpers;
pub(crate) mod models;
pub(crate) mod router;
pub(crate) mod students;
pub(crate) mod uploads;
pub(crate) mod validation;
