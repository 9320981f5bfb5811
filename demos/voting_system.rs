//! Verifiable voting with a jointly held election key
//!
//! Each candidate is encoded as a small prime. A ballot is an encryption of
//! its candidate's prime plus a disjunctive proof that it encrypts one of
//! the candidate primes. The homomorphic product of all ballots decrypts to
//! `prod(prime_i ^ votes_i)`, which factors back into per-candidate counts.
//! Decryption needs a factor from every trustee, each with a proof.

use std::collections::HashMap;

use rand::thread_rng;
use tracing_subscriber::EnvFilter;
use zkelgamal::{
    disjunctive_challenge, dlog_challenge, fiat_shamir_challenge, BigNum, Ciphertext,
    CryptoSystem, KeyPair, Plaintext, PublicKey, ZKDisjunctiveProof,
};

const CANDIDATE_PRIMES: [u64; 3] = [2, 3, 5];

/// A verifiable encrypted vote
struct EncryptedVote {
    voter_id: String,
    ballot: Ciphertext,
    proof: ZKDisjunctiveProof,
}

struct VotingSystem {
    candidates: Vec<String>,
    choices: Vec<Plaintext>,
    trustees: Vec<KeyPair>,
    election_key: PublicKey,
    votes: Vec<EncryptedVote>,
}

impl VotingSystem {
    fn new(candidates: Vec<String>, trustee_count: usize) -> zkelgamal::Result<Self> {
        println!("Generating election parameters...");
        let mut rng = thread_rng();
        let params = CryptoSystem::generate_secure_parameters(1024, &mut rng)?;
        println!("  {params}");

        let mut trustees = Vec::with_capacity(trustee_count);
        for index in 0..trustee_count {
            let trustee = params.generate_key_pair(&mut rng)?;
            // Each trustee proves possession of their share before it is accepted
            let proof = trustee.sk.prove_sk(dlog_challenge, &mut rng)?;
            trustee.pk.verify_sk_proof(&proof, dlog_challenge)?;
            println!("  trustee {index}: {}", trustee.pk.fingerprint());
            trustees.push(trustee);
        }

        let mut election_key = trustees[0].pk.clone();
        for trustee in &trustees[1..] {
            election_key = election_key.multiply(&trustee.pk)?;
        }
        println!("  election key: {}", election_key.fingerprint());

        let choices = CANDIDATE_PRIMES[..candidates.len()]
            .iter()
            .map(|&prime| Plaintext::from(prime))
            .collect();

        Ok(VotingSystem {
            candidates,
            choices,
            trustees,
            election_key,
            votes: Vec::new(),
        })
    }

    fn cast_vote(&mut self, voter_id: &str, candidate_index: usize) -> Result<(), String> {
        if self.votes.iter().any(|v| v.voter_id == voter_id) {
            return Err(format!("{voter_id} has already voted"));
        }
        let choice = self
            .choices
            .get(candidate_index)
            .ok_or_else(|| format!("invalid candidate index {candidate_index}"))?;

        let mut rng = thread_rng();
        let (ballot, r) = self
            .election_key
            .encrypt_return_r(choice, &mut rng)
            .map_err(|e| format!("encryption failed: {e}"))?;
        let proof = ballot
            .generate_disjunctive_encryption_proof(
                &self.choices,
                candidate_index,
                &r,
                disjunctive_challenge,
                &mut rng,
            )
            .map_err(|e| format!("proof generation failed: {e}"))?;

        // The bulletin board checks the proof before accepting the ballot
        ballot
            .verify_disjunctive_encryption_proof(&self.choices, &proof, disjunctive_challenge)
            .map_err(|e| format!("ballot rejected: {e}"))?;

        self.votes.push(EncryptedVote {
            voter_id: voter_id.to_string(),
            ballot,
            proof,
        });
        println!("✓ Ballot accepted from {voter_id}");
        Ok(())
    }

    fn tally(&self) -> zkelgamal::Result<HashMap<String, u32>> {
        println!("\nTallying {} ballots homomorphically...", self.votes.len());

        // Anyone can re-check every published ballot
        for vote in &self.votes {
            vote.ballot.verify_disjunctive_encryption_proof(
                &self.choices,
                &vote.proof,
                disjunctive_challenge,
            )?;
        }

        let ballots: Vec<Ciphertext> = self.votes.iter().map(|v| v.ballot.clone()).collect();
        let encrypted_tally = Ciphertext::product(&self.election_key, &ballots)?;

        let mut rng = thread_rng();
        let mut factors = Vec::with_capacity(self.trustees.len());
        for (index, trustee) in self.trustees.iter().enumerate() {
            let (factor, proof) = trustee.sk.decryption_factor_and_proof(
                &encrypted_tally,
                fiat_shamir_challenge,
                &mut rng,
            )?;
            encrypted_tally.verify_decryption_factor(
                &factor,
                &proof,
                &trustee.pk,
                fiat_shamir_challenge,
            )?;
            println!("  trustee {index} contributed a verified decryption factor");
            factors.push(factor);
        }

        let product = encrypted_tally.decrypt_with_factors(&factors)?;
        let mut remaining = product.m().clone();

        let mut counts = HashMap::new();
        for (candidate, &prime) in self.candidates.iter().zip(CANDIDATE_PRIMES.iter()) {
            let prime = BigNum::from(prime);
            let mut count = 0u32;
            while remaining.modulo(&prime)?.is_zero() {
                remaining = remaining.div_floor(&prime)?;
                count += 1;
            }
            counts.insert(candidate.clone(), count);
        }

        Ok(counts)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Verifiable Voting Demo ===\n");

    let candidates = vec![
        "Alice".to_string(),
        "Bob".to_string(),
        "Charlie".to_string(),
    ];
    let mut system = VotingSystem::new(candidates, 2)?;

    println!("\nCasting votes...");
    let ballots = [
        ("voter1", 0),
        ("voter2", 1),
        ("voter3", 0),
        ("voter4", 2),
        ("voter5", 0),
        ("voter6", 1),
    ];
    for (voter, choice) in ballots {
        system.cast_vote(voter, choice)?;
    }

    if let Err(e) = system.cast_vote("voter1", 2) {
        println!("✗ {e}");
    }

    let results = system.tally()?;
    println!("\nResults:");
    for candidate in &system.candidates {
        println!("  {}: {}", candidate, results.get(candidate).copied().unwrap_or(0));
    }

    Ok(())
}
