pub mod regsense_env;
pub mod stub_backend;
