//! Non-interactive zero-knowledge proofs for verifiable operations
//!
//! Every proof here is a Sigma protocol made non-interactive with a
//! caller-supplied challenge generator (see [`crate::challenge`]).
//! Challenges and responses live in `[0, q)`.
//!
//! Verification never panics and never returns an [`ElGamalError`]: an
//! invalid proof is an ordinary [`VerificationFailure`] value naming the
//! check that failed.

use rand_core::CryptoRngCore;
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bigint::BigNum;
use crate::challenge::fiat_shamir_challenge;
use crate::error::{ElGamalError, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::params::CryptoSystem;
use crate::types::{Ciphertext, Commitment, Plaintext};
use crate::utils::random_below;

/// Outcome of verifying a proof
pub type Verification = std::result::Result<(), VerificationFailure>;

/// Why a proof was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    #[error("first verification equation does not hold")]
    FirstCheck,

    #[error("second verification equation does not hold")]
    SecondCheck,

    #[error("challenge does not match the transcript")]
    ChallengeMismatch,

    #[error("claimed plaintext or factor is not invertible mod p")]
    NotInvertible,

    #[error("expected {expected} proofs, found {found}")]
    ProofCountMismatch { expected: usize, found: usize },

    #[error("branch {index}: {reason}")]
    Branch {
        index: usize,
        reason: Box<VerificationFailure>,
    },

    #[error("branch challenges do not sum to the disjunctive challenge")]
    ChallengeSumMismatch,

    #[error("malformed proof: {0}")]
    Malformed(String),
}

impl From<ElGamalError> for VerificationFailure {
    fn from(err: ElGamalError) -> Self {
        match err {
            ElGamalError::NoInverseExists => VerificationFailure::NotInvertible,
            other => VerificationFailure::Malformed(other.to_string()),
        }
    }
}

/// Schnorr proof of knowledge of `x` with `y = g^x mod p`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DLogProof {
    pub commitment: BigNum,
    pub challenge: BigNum,
    pub response: BigNum,
}

/// Chaum-Pedersen proof of equal discrete logs
///
/// Proves knowledge of `x` such that `G = g^x` and `H = h^x` for a public
/// tuple `(g, h, G, H)`. An encryption proof instantiates the tuple as
/// `(g, y, alpha, beta/m)` with witness `r`; a decryption proof as
/// `(g, alpha, y, beta/m)` with witness `x`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZKProof {
    pub commitment: Commitment,
    pub challenge: BigNum,
    pub response: BigNum,
}

/// OR-composition of [`ZKProof`]s, one per candidate plaintext
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZKDisjunctiveProof {
    pub proofs: Vec<ZKProof>,
}

fn check_scalars(challenge: &BigNum, response: &BigNum, q: &BigNum) -> Verification {
    let in_range = |v: &BigNum| !v.is_negative() && v < q;
    if in_range(challenge) && in_range(response) {
        Ok(())
    } else {
        Err(VerificationFailure::Malformed(
            "challenge and response must lie in [0, q)".to_string(),
        ))
    }
}

impl ZKProof {
    /// Prove `log_g(G) = log_h(H) = x`
    ///
    /// Only `g`, `h` and the witness are needed: the prover never has to
    /// materialize `G` or `H`.
    pub fn generate(
        little_g: &BigNum,
        little_h: &BigNum,
        x: &BigNum,
        params: &CryptoSystem,
        challenge_gen: impl Fn(&Commitment) -> BigNum,
        rng: &mut impl CryptoRngCore,
    ) -> Result<ZKProof> {
        let (p, q) = (params.p(), params.q());

        let w = random_below(q, rng)?;
        let commitment = Commitment::new(little_g.mod_pow(&w, p)?, little_h.mod_pow(&w, p)?);
        let challenge = challenge_gen(&commitment).modulo(q)?;
        let response = (w + x * &challenge).modulo(q)?;

        Ok(ZKProof {
            commitment,
            challenge,
            response,
        })
    }

    /// Check `g^t = A * G^c` and `h^t = B * H^c (mod p)`
    ///
    /// The challenge itself is taken as given; see [`ZKProof::verify_bound`].
    pub fn verify(
        &self,
        little_g: &BigNum,
        little_h: &BigNum,
        big_g: &BigNum,
        big_h: &BigNum,
        params: &CryptoSystem,
    ) -> Verification {
        let p = params.p();
        check_scalars(&self.challenge, &self.response, params.q())?;

        let lhs = little_g.mod_pow(&self.response, p)?;
        let rhs = (&self.commitment.a * big_g.mod_pow(&self.challenge, p)?).modulo(p)?;
        if lhs != rhs {
            return Err(VerificationFailure::FirstCheck);
        }

        let lhs = little_h.mod_pow(&self.response, p)?;
        let rhs = (&self.commitment.b * big_h.mod_pow(&self.challenge, p)?).modulo(p)?;
        if lhs != rhs {
            return Err(VerificationFailure::SecondCheck);
        }

        Ok(())
    }

    /// [`ZKProof::verify`], additionally recomputing the challenge from the commitment
    pub fn verify_bound(
        &self,
        little_g: &BigNum,
        little_h: &BigNum,
        big_g: &BigNum,
        big_h: &BigNum,
        params: &CryptoSystem,
        challenge_gen: impl Fn(&Commitment) -> BigNum,
    ) -> Verification {
        if challenge_gen(&self.commitment).modulo(params.q())? != self.challenge {
            return Err(VerificationFailure::ChallengeMismatch);
        }
        self.verify(little_g, little_h, big_g, big_h, params)
    }
}

impl SecretKey {
    /// Schnorr proof of possession of `x`
    pub fn prove_sk(
        &self,
        challenge_gen: impl Fn(&BigNum) -> BigNum,
        rng: &mut impl CryptoRngCore,
    ) -> Result<DLogProof> {
        let pk = &self.public_key;
        let (p, q) = (pk.p(), pk.q());

        let w = random_below(q, rng)?;
        let commitment = pk.g().mod_pow(&w, p)?;
        let challenge = challenge_gen(&commitment).modulo(q)?;
        let response = (w + &self.x * &challenge).modulo(q)?;

        Ok(DLogProof {
            commitment,
            challenge,
            response,
        })
    }

    /// Decryption factor `alpha^x` together with a proof that it was computed
    /// with the exponent behind this key's `y`
    pub fn decryption_factor_and_proof(
        &self,
        ciphertext: &Ciphertext,
        challenge_gen: impl Fn(&Commitment) -> BigNum,
        rng: &mut impl CryptoRngCore,
    ) -> Result<(BigNum, ZKProof)> {
        let factor = self.decryption_factor(ciphertext)?;
        let proof = ZKProof::generate(
            self.public_key.g(),
            &ciphertext.alpha,
            &self.x,
            self.public_key.params(),
            challenge_gen,
            rng,
        )?;

        Ok((factor, proof))
    }

    /// Decrypt and prove the decryption was done honestly
    ///
    /// The challenge is `H("a,b")` over the proof commitment; check the
    /// result with [`Ciphertext::verify_decryption_proof`].
    pub fn prove_decryption(
        &self,
        ciphertext: &Ciphertext,
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Plaintext, ZKProof)> {
        let (factor, proof) = self.decryption_factor_and_proof(ciphertext, fiat_shamir_challenge, rng)?;
        let plaintext = self.decrypt_with_factor(ciphertext, &factor)?;

        Ok((plaintext, proof))
    }
}

impl PublicKey {
    /// Verify a proof of possession of the secret key behind `y`
    pub fn verify_sk_proof(
        &self,
        proof: &DLogProof,
        challenge_gen: impl Fn(&BigNum) -> BigNum,
    ) -> Verification {
        self.check_sk_proof(proof, challenge_gen)
            .inspect_err(|failure| debug!(reason = %failure, "secret key proof rejected"))
    }

    fn check_sk_proof(
        &self,
        proof: &DLogProof,
        challenge_gen: impl Fn(&BigNum) -> BigNum,
    ) -> Verification {
        let (p, q) = (self.p(), self.q());
        check_scalars(&proof.challenge, &proof.response, q)?;

        if challenge_gen(&proof.commitment).modulo(q)? != proof.challenge {
            return Err(VerificationFailure::ChallengeMismatch);
        }

        let lhs = self.g().mod_pow(&proof.response, p)?;
        let rhs = (&proof.commitment * self.y.mod_pow(&proof.challenge, p)?).modulo(p)?;
        if lhs != rhs {
            return Err(VerificationFailure::FirstCheck);
        }

        Ok(())
    }

    /// Encrypt with fresh randomness and prove the ciphertext encrypts `plaintext`
    pub fn encrypt_with_proof(
        &self,
        plaintext: &Plaintext,
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Ciphertext, ZKProof)> {
        let (ciphertext, r) = self.encrypt_return_r(plaintext, rng)?;
        let proof = ciphertext.generate_encryption_proof(&r, fiat_shamir_challenge, rng)?;

        Ok((ciphertext, proof))
    }
}

impl Ciphertext {
    /// `beta / value mod p`
    fn beta_over(&self, value: &BigNum) -> Result<BigNum> {
        let p = self.pk.p();
        (&self.beta * value.mod_inverse(p)?).modulo(p)
    }

    /// Prove knowledge of the randomness `r` this ciphertext was built with
    pub fn generate_encryption_proof(
        &self,
        r: &BigNum,
        challenge_gen: impl Fn(&Commitment) -> BigNum,
        rng: &mut impl CryptoRngCore,
    ) -> Result<ZKProof> {
        ZKProof::generate(self.pk.g(), &self.pk.y, r, self.pk.params(), challenge_gen, rng)
    }

    /// Build an accepting transcript for `plaintext` without knowing `r`
    ///
    /// Picks the challenge (unless given) and the response, then solves the
    /// verification equations for the commitment.
    pub fn simulate_encryption_proof(
        &self,
        plaintext: &Plaintext,
        challenge: Option<&BigNum>,
        rng: &mut impl CryptoRngCore,
    ) -> Result<ZKProof> {
        let (p, q) = (self.pk.p(), self.pk.q());

        let challenge = match challenge {
            Some(challenge) => challenge.modulo(q)?,
            None => random_below(q, rng)?,
        };
        let response = random_below(q, rng)?;
        let neg_challenge = -&challenge;

        // A = g^t * alpha^-c, B = y^t * (beta/m)^-c
        let a = (self.pk.g().mod_pow(&response, p)? * self.alpha.mod_pow(&neg_challenge, p)?)
            .modulo(p)?;
        let b = (self.pk.y.mod_pow(&response, p)?
            * self.beta_over(plaintext.m())?.mod_pow(&neg_challenge, p)?)
        .modulo(p)?;

        Ok(ZKProof {
            commitment: Commitment::new(a, b),
            challenge,
            response,
        })
    }

    /// Prove this ciphertext encrypts one of `plaintexts` without revealing which
    ///
    /// Every branch except `real_index` is simulated first. The real branch's
    /// challenge is then fixed to `C - sum(others) mod q`, where `C` is
    /// `challenge_gen` over all commitments in order.
    pub fn generate_disjunctive_encryption_proof(
        &self,
        plaintexts: &[Plaintext],
        real_index: usize,
        r: &BigNum,
        challenge_gen: impl Fn(&[Commitment]) -> BigNum,
        rng: &mut impl CryptoRngCore,
    ) -> Result<ZKDisjunctiveProof> {
        if real_index >= plaintexts.len() {
            return Err(ElGamalError::InvalidRealIndex {
                index: real_index,
                len: plaintexts.len(),
            });
        }

        let mut proofs = plaintexts
            .iter()
            .enumerate()
            .map(|(index, plaintext)| {
                if index == real_index {
                    Ok(None)
                } else {
                    self.simulate_encryption_proof(plaintext, None, rng).map(Some)
                }
            })
            .collect::<Result<Vec<Option<ZKProof>>>>()?;

        let others: BigNum = proofs.iter().flatten().map(|proof| &proof.challenge).sum();
        let real_challenge = |commitment: &Commitment| {
            let commitments: Vec<Commitment> = proofs
                .iter()
                .map(|proof| match proof {
                    Some(proof) => proof.commitment.clone(),
                    None => commitment.clone(),
                })
                .collect();
            challenge_gen(&commitments) - &others
        };
        let real = self.generate_encryption_proof(r, real_challenge, rng)?;
        proofs[real_index] = Some(real);

        Ok(ZKDisjunctiveProof {
            proofs: proofs.into_iter().flatten().collect(),
        })
    }

    /// Check an encryption proof's equations against `plaintext`
    ///
    /// The challenge is not recomputed, which is what disjunctive branches
    /// need; use [`Ciphertext::verify_bound_encryption_proof`] for a
    /// standalone Fiat-Shamir proof.
    pub fn verify_encryption_proof(&self, plaintext: &Plaintext, proof: &ZKProof) -> Verification {
        self.check_encryption_proof(plaintext, proof)
            .inspect_err(|failure| debug!(reason = %failure, "encryption proof rejected"))
    }

    fn check_encryption_proof(&self, plaintext: &Plaintext, proof: &ZKProof) -> Verification {
        let beta_over_m = self.beta_over(plaintext.m())?;
        proof.verify(self.pk.g(), &self.pk.y, &self.alpha, &beta_over_m, self.pk.params())
    }

    /// Verify an encryption proof, including that its challenge was derived
    /// from its commitment by `challenge_gen`
    pub fn verify_bound_encryption_proof(
        &self,
        plaintext: &Plaintext,
        proof: &ZKProof,
        challenge_gen: impl Fn(&Commitment) -> BigNum,
    ) -> Verification {
        let result = match challenge_gen(&proof.commitment).modulo(self.pk.q()) {
            Ok(expected) if expected == proof.challenge => self.check_encryption_proof(plaintext, proof),
            Ok(_) => Err(VerificationFailure::ChallengeMismatch),
            Err(err) => Err(err.into()),
        };
        result.inspect_err(|failure| debug!(reason = %failure, "encryption proof rejected"))
    }

    /// Verify that this ciphertext encrypts one of `plaintexts`
    ///
    /// Branches are checked in order and the first failing one is reported.
    pub fn verify_disjunctive_encryption_proof(
        &self,
        plaintexts: &[Plaintext],
        proof: &ZKDisjunctiveProof,
        challenge_gen: impl Fn(&[Commitment]) -> BigNum,
    ) -> Verification {
        self.check_disjunctive_encryption_proof(plaintexts, proof, challenge_gen)
            .inspect_err(|failure| debug!(reason = %failure, "disjunctive proof rejected"))
    }

    fn check_disjunctive_encryption_proof(
        &self,
        plaintexts: &[Plaintext],
        proof: &ZKDisjunctiveProof,
        challenge_gen: impl Fn(&[Commitment]) -> BigNum,
    ) -> Verification {
        if plaintexts.len() != proof.proofs.len() {
            return Err(VerificationFailure::ProofCountMismatch {
                expected: plaintexts.len(),
                found: proof.proofs.len(),
            });
        }

        for (index, (plaintext, branch)) in plaintexts.iter().zip(&proof.proofs).enumerate() {
            self.check_encryption_proof(plaintext, branch)
                .map_err(|reason| VerificationFailure::Branch {
                    index,
                    reason: Box::new(reason),
                })?;
        }

        let q = self.pk.q();
        let commitments: Vec<Commitment> = proof
            .proofs
            .iter()
            .map(|branch| branch.commitment.clone())
            .collect();
        let expected = challenge_gen(&commitments).modulo(q)?;
        let sum: BigNum = proof.proofs.iter().map(|branch| &branch.challenge).sum();
        if sum.modulo(q)? != expected {
            return Err(VerificationFailure::ChallengeSumMismatch);
        }

        Ok(())
    }

    /// Verify a proof from [`SecretKey::prove_decryption`] that this
    /// ciphertext decrypts to `plaintext`
    pub fn verify_decryption_proof(&self, plaintext: &Plaintext, proof: &ZKProof) -> Verification {
        let result = self.beta_over(plaintext.m()).map_err(VerificationFailure::from).and_then(|factor| {
            proof.verify_bound(
                self.pk.g(),
                &self.alpha,
                &self.pk.y,
                &factor,
                self.pk.params(),
                fiat_shamir_challenge,
            )
        });
        result.inspect_err(|failure| debug!(reason = %failure, "decryption proof rejected"))
    }

    /// Verify that `factor = alpha^x` for the secret key behind `pk`
    ///
    /// `pk` is the key of the party that produced the factor, which for a
    /// joint key differs from the key this ciphertext is bound to.
    pub fn verify_decryption_factor(
        &self,
        factor: &BigNum,
        proof: &ZKProof,
        pk: &PublicKey,
        challenge_gen: impl Fn(&Commitment) -> BigNum,
    ) -> Verification {
        proof
            .verify_bound(pk.g(), &self.alpha, &pk.y, factor, pk.params(), challenge_gen)
            .inspect_err(|failure| debug!(reason = %failure, "decryption factor proof rejected"))
    }
}
