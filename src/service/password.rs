use subtle::ConstantTimeEq;

/// Turns a submitted password into its stored form and checks candidates
/// against it. Every read and write of the `password` column goes through here.
pub trait PasswordScheme: Send + Sync {
    fn encode(&self, password: &str) -> String;
    fn verify(&self, candidate: &str, stored: &str) -> bool;
}

/// Stores the password verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl PasswordScheme for Plaintext {
    fn encode(&self, password: &str) -> String {
        password.to_string()
    }

    fn verify(&self, candidate: &str, stored: &str) -> bool {
        candidate.as_bytes().ct_eq(stored.as_bytes()).into()
    }
}
