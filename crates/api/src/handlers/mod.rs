pub mod certification;
pub mod certification_admin;
