pub mod forms;
pub mod password;

pub use password::{PasswordScheme, Plaintext};
