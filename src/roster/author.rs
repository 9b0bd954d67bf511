// src/roster/author.rs
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One researcher, built from every registry row sharing an `Id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub radon_id: String,
    pub aid: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub surname_prefix: Option<String>,
    pub surname: Option<String>,
    pub fullname: String,
    /// Normalised institution of the declared main job.
    pub main_job: Option<String>,
    pub disciplines: Option<String>,
    pub degree: Option<String>,
    pub degree_year: Option<String>,
    /// Bare ORCID iD (no host).
    pub orcid: Option<String>,
    #[serde(default)]
    pub alternative_names: Vec<String>,
}

impl Author {
    pub fn has_orcid(&self) -> bool {
        self.orcid.as_deref().is_some_and(|o| !o.is_empty())
    }
}

/// Three uppercase letters/digits derived from the registry id, so
/// re-running the pipeline reproduces the same Aid.
pub fn aid_code(radon_id: &str) -> String {
    const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let digest = Sha256::digest(radon_id.as_bytes());
    digest.iter().take(3).map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char).collect()
}

/// `Jan_Kowalski_X7Q`
pub fn make_aid(fullname: &str, radon_id: &str) -> String {
    join!(&fullname.replace(' ', "_"), "_", &aid_code(radon_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aid_is_stable_and_shaped() {
        let a = make_aid("Jan Maria Kowalski", "12345");
        let b = make_aid("Jan Maria Kowalski", "12345");
        assert_eq!(a, b);
        assert!(a.starts_with("Jan_Maria_Kowalski_"));
        let code = a.rsplit('_').next().unwrap();
        assert_eq!(code.len(), 3);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
