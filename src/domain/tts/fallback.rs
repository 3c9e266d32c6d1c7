use super::vendor::{CredentialOrigin, TtsVendor};
use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;

/// Which part of the selection produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CharacterOverride,
    Preference,
    SystemChain,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::CharacterOverride => "character_override",
            Phase::Preference => "preference",
            Phase::SystemChain => "system_chain",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub secret: String,
    pub origin: CredentialOrigin,
}

impl Credential {
    pub fn user(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            origin: CredentialOrigin::User,
        }
    }

    pub fn system(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            origin: CredentialOrigin::System,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// One step of the plan. Its precondition is that a credential is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub phase: Phase,
    pub vendor: TtsVendor,
    pub credential: Option<Credential>,
}

impl Candidate {
    pub fn new(phase: Phase, vendor: TtsVendor, credential: Option<Credential>) -> Self {
        Self {
            phase,
            vendor,
            credential,
        }
    }
}

/// A successful attempt and the candidate that produced it
#[derive(Debug)]
pub struct Success<T> {
    pub candidate: Candidate,
    pub value: T,
}

/// Run candidates in order and return the first successful attempt.
///
/// Candidates without a credential are skipped. A candidate whose vendor and
/// credential were already tried earlier in the same plan is skipped too.
/// Returns `None` once the plan is exhausted.
pub async fn first_success<T, E, F, Fut>(
    candidates: Vec<Candidate>,
    mut attempt: F,
) -> Option<Success<T>>
where
    F: FnMut(TtsVendor, Credential) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut tried: HashSet<(TtsVendor, String)> = HashSet::new();

    for candidate in candidates {
        let Some(credential) = candidate.credential.clone() else {
            if candidate.phase == Phase::SystemChain {
                tracing::debug!(
                    phase = %candidate.phase,
                    vendor = %candidate.vendor,
                    "No system credential, skipping vendor"
                );
            } else {
                tracing::info!(
                    phase = %candidate.phase,
                    vendor = %candidate.vendor,
                    "No credential available, falling through"
                );
            }
            continue;
        };

        if !tried.insert((candidate.vendor, credential.secret.clone())) {
            tracing::debug!(
                phase = %candidate.phase,
                vendor = %candidate.vendor,
                credential_origin = %credential.origin,
                "Vendor already attempted with this credential, skipping"
            );
            continue;
        }

        match attempt(candidate.vendor, credential.clone()).await {
            Ok(value) => return Some(Success { candidate, value }),
            Err(e) => {
                tracing::warn!(
                    phase = %candidate.phase,
                    vendor = %candidate.vendor,
                    credential_origin = %credential.origin,
                    error = %e,
                    "TTS attempt failed, trying next candidate"
                );
            }
        }
    }

    None
}
