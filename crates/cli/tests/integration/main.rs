mod common;
mod items_tests;
mod projects_tests;
mod strip_tests;
