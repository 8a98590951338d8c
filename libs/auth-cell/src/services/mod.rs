pub mod auth;
pub mod users;

pub use auth::AuthService;
pub use users::UsersService;
