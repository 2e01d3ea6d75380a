pub(crate) mod budget;
pub(crate) mod dashboard;
pub(crate) mod savings;
