pub mod credentials;
pub mod db;
pub mod suggestion_llm;

pub use credentials::{Argon2Verifier, FixedSecretVerifier};
pub use db::DbAdapter;
pub use suggestion_llm::{DisabledSuggestionAdapter, OpenAiSuggestionAdapter};
