pub mod auth;
pub mod dashboard;
pub mod home;

pub use self::auth::model::LoginForm;
