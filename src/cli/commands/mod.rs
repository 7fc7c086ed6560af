mod check_password;
mod create_user;
mod init_db;
mod serve;

pub use check_password::cmd_check_password;
pub use create_user::cmd_create_user;
pub use init_db::cmd_init_db;
pub use serve::cmd_serve;
