pub mod backends;
pub mod build_system {
    pub mod build;
    pub mod file_output;
}
pub mod compiler_frontend;
pub mod projects;
