use std::fmt;

pub const DEFAULT_FTP_PORT: u16 = 21;

/// Username and password of the conventional anonymous login.
pub const ANONYMOUS: &str = "anonymous";

/// Appends the default FTP port when `target` carries none.
///
/// Any `:` counts as a port separator, so bare IPv6 literals must be given
/// with an explicit port (`[::1]:21`).
pub fn normalize_target(target: &str) -> String {
    if target.contains(':') {
        target.to_string()
    } else {
        format!("{target}:{DEFAULT_FTP_PORT}")
    }
}

/// Which credentials a check logs in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPolicy<'a> {
    Credentials { username: &'a str, password: &'a str },
    UsernameOnly { username: &'a str },
    Anonymous,
}

impl<'a> LoginPolicy<'a> {
    pub fn from_credentials(username: &'a str, password: &'a str) -> Self {
        match (username.is_empty(), password.is_empty()) {
            (false, false) => LoginPolicy::Credentials { username, password },
            (false, true) => LoginPolicy::UsernameOnly { username },
            (true, _) => LoginPolicy::Anonymous,
        }
    }

    /// The username/password pair sent to the server.
    pub fn credentials(&self) -> (&'a str, &'a str) {
        match *self {
            LoginPolicy::Credentials { username, password } => (username, password),
            LoginPolicy::UsernameOnly { username } => (username, ""),
            LoginPolicy::Anonymous => (ANONYMOUS, ANONYMOUS),
        }
    }
}

// Never prints the password.
impl fmt::Display for LoginPolicy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginPolicy::Credentials { username, .. } => {
                write!(f, "user '{username}' with password")
            }
            LoginPolicy::UsernameOnly { username } => {
                write!(f, "user '{username}' without password")
            }
            LoginPolicy::Anonymous => write!(f, "anonymous"),
        }
    }
}
