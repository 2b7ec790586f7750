mod password;

pub use password::Authenticator;
