pub(crate) mod classes;
pub(crate) mod exams;
pub(crate) mod health;
pub(crate) mod students;
pub(crate) mod submissions;
