
/// Query-level tests against sea-orm's mock connection
pub mod crud_tests;
