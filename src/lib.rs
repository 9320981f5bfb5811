//! # ElGamal over prime-order subgroups
//!
//! This library provides an implementation of ElGamal encryption with:
//! - Homomorphic multiplication and re-encryption of ciphertexts
//! - Joint keys and decryption factors for multi-party decryption
//! - Non-interactive zero-knowledge proofs (Schnorr, Chaum-Pedersen and
//!   disjunctive OR-proofs) made non-interactive with Fiat-Shamir
//!
//! ## Features
//!
//! - **Verifiable encryption**: prove a ciphertext encrypts a given plaintext,
//!   or one of a list of candidates without revealing which
//! - **Verifiable decryption**: prove a plaintext or decryption factor was
//!   computed with the secret key behind a public key
//! - **Offline verification**: every key, ciphertext and proof has a JSON form
//!   with integers as decimal strings (`serde` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use rand::thread_rng;
//! use zkelgamal::{disjunctive_challenge, CryptoSystem, KeyPair, Plaintext};
//!
//! let mut rng = thread_rng();
//!
//! // A toy safe-prime group; use CryptoSystem::generate_secure_parameters in practice
//! let params = CryptoSystem::new(2039u32.into(), 1019u32.into(), 4u32.into());
//! let keypair = KeyPair::create(&params, &mut rng).unwrap();
//!
//! // Encrypt a ballot for candidate 1 of 3
//! let candidates = [Plaintext::from(2), Plaintext::from(3), Plaintext::from(5)];
//! let (ballot, r) = keypair.pk.encrypt_return_r(&candidates[1], &mut rng).unwrap();
//!
//! // Prove the ballot is for one of the candidates without revealing which
//! let proof = ballot
//!     .generate_disjunctive_encryption_proof(&candidates, 1, &r, disjunctive_challenge, &mut rng)
//!     .unwrap();
//! assert!(ballot
//!     .verify_disjunctive_encryption_proof(&candidates, &proof, disjunctive_challenge)
//!     .is_ok());
//!
//! // Homomorphic multiplication
//! let other = keypair.pk.encrypt(&candidates[2], &mut rng).unwrap();
//! let product = ballot.multiply(&other).unwrap();
//! assert_eq!(keypair.sk.decrypt(&product).unwrap(), Plaintext::from(15));
//! ```

pub mod bigint;
pub mod challenge;
pub mod encryption;
pub mod error;
pub mod homomorphic;
pub mod keys;
pub mod params;
pub mod proofs;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use bigint::BigNum;
pub use challenge::{
    disjunctive_challenge, dlog_challenge, fiat_shamir_challenge, hash_to_bignum, sha1_fingerprint,
};
pub use error::{ElGamalError, Result};
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use params::{CryptoSystem, ParameterConfig};
pub use proofs::{DLogProof, Verification, VerificationFailure, ZKDisjunctiveProof, ZKProof};
pub use types::{Ciphertext, CiphertextData, Commitment, Plaintext};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
