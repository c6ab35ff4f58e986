pub mod password;
pub mod session;

pub use self::session::{Session, SessionStore, SESSION_COOKIE};
