//! Integration tests for the ElGamal library

mod common;

use rand::thread_rng;
use zkelgamal::{
    disjunctive_challenge, dlog_challenge, fiat_shamir_challenge, hash_to_bignum, BigNum,
    Ciphertext, ElGamalError, KeyPair, Plaintext, VerificationFailure,
};

use common::*;

#[test]
fn test_fixed_key_scenario() {
    let params = params();
    params.validate().unwrap();
    assert!(params.is_safe_prime_group());
    assert_eq!(params.bit_size(), 2048);

    let keypair = fixed_keypair();
    assert_eq!(keypair.pk.y(), &num(EXPECTED_Y));

    let ciphertext = keypair
        .pk
        .encrypt_with_r(&Plaintext::from(MESSAGE), &BigNum::from(R))
        .unwrap();
    assert_eq!(ciphertext.alpha(), &num(EXPECTED_ALPHA));
    assert_eq!(ciphertext.beta(), &num(EXPECTED_BETA));

    let decrypted = keypair.sk.decrypt(&ciphertext).unwrap();
    assert_eq!(decrypted, Plaintext::from(MESSAGE));
}

#[test]
fn test_pinned_hash_and_fingerprint() {
    assert_eq!(hash_to_bignum("hello"), num(HELLO_HASH));
    assert!(Plaintext::from_string("hello").matches_string("hello"));

    let keypair = fixed_keypair();
    assert_eq!(keypair.pk.fingerprint(), EXPECTED_FINGERPRINT);
    assert_eq!(
        keypair.pk.to_string(),
        format!("PublicKey(2048 bits, {EXPECTED_FINGERPRINT})")
    );
}

#[test]
fn test_end_to_end_multiplicative_workflow() {
    let mut rng = thread_rng();
    let keypair = KeyPair::create(&params(), &mut rng).unwrap();

    // Encrypt multiple values
    let values = [2u64, 3, 5, 7];
    let ciphertexts: Vec<Ciphertext> = values
        .iter()
        .map(|&v| keypair.pk.encrypt(&Plaintext::from(v), &mut rng).unwrap())
        .collect();

    let pairwise = ciphertexts[0].multiply(&ciphertexts[1]).unwrap();
    assert_eq!(keypair.sk.decrypt(&pairwise).unwrap(), Plaintext::from(6));

    let product = Ciphertext::product(&keypair.pk, &ciphertexts).unwrap();
    assert_eq!(
        keypair.sk.decrypt(&product).unwrap(),
        Plaintext::from(2 * 3 * 5 * 7)
    );
}

#[test]
fn test_hashed_plaintexts_round_trip() {
    let mut rng = thread_rng();
    let keypair = KeyPair::create(&params(), &mut rng).unwrap();

    for plaintext in Plaintext::from_strings(&["alice", "bob", "carol"]) {
        let ciphertext = keypair.pk.encrypt(&plaintext, &mut rng).unwrap();
        assert_eq!(keypair.sk.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn test_reencryption_preserves_plaintext() {
    let mut rng = thread_rng();
    let keypair = KeyPair::create(&params(), &mut rng).unwrap();
    let plaintext = Plaintext::from(31337);

    let original = keypair.pk.encrypt(&plaintext, &mut rng).unwrap();
    let reencrypted = original.reenc_with_r(&BigNum::from(987654321u64)).unwrap();
    assert_ne!(original, reencrypted);
    assert_eq!(keypair.sk.decrypt(&reencrypted).unwrap(), plaintext);

    let again = reencrypted.reenc(&mut rng).unwrap();
    assert_ne!(again, reencrypted);
    assert_eq!(keypair.sk.decrypt(&again).unwrap(), plaintext);
}

#[test]
fn test_cross_key_algebra_is_rejected() {
    let mut rng = thread_rng();
    let a = KeyPair::create(&params(), &mut rng).unwrap();
    let b = KeyPair::create(&params(), &mut rng).unwrap();

    let ct_a = a.pk.encrypt(&Plaintext::from(2), &mut rng).unwrap();
    let ct_b = b.pk.encrypt(&Plaintext::from(3), &mut rng).unwrap();
    assert_eq!(ct_a.multiply(&ct_b), Err(ElGamalError::KeyMismatch));
}

#[test]
fn test_subgroup_encoding_with_large_group() {
    let mut rng = thread_rng();
    let keypair = KeyPair::create(&params(), &mut rng).unwrap();
    let plaintext = Plaintext::from(MESSAGE);

    let ciphertext = keypair
        .pk
        .encrypt_encoded_with_r(&plaintext, &BigNum::from(R))
        .unwrap();
    assert_eq!(keypair.sk.decrypt_decoded(&ciphertext).unwrap(), plaintext);
}

#[test_log::test]
fn test_secret_key_proof() {
    let mut rng = thread_rng();
    let a = KeyPair::create(&params(), &mut rng).unwrap();
    let b = KeyPair::create(&params(), &mut rng).unwrap();

    let proof = a.sk.prove_sk(dlog_challenge, &mut rng).unwrap();
    assert_eq!(a.pk.verify_sk_proof(&proof, dlog_challenge), Ok(()));

    // A proof for key A says nothing about key B
    assert_eq!(
        b.pk.verify_sk_proof(&proof, dlog_challenge),
        Err(VerificationFailure::FirstCheck)
    );
}

#[test]
fn test_encryption_proof() {
    let mut rng = thread_rng();
    let keypair = fixed_keypair();
    let plaintext = Plaintext::from_string("yes");

    let (ciphertext, proof) = keypair.pk.encrypt_with_proof(&plaintext, &mut rng).unwrap();
    assert_eq!(
        ciphertext.verify_bound_encryption_proof(&plaintext, &proof, fiat_shamir_challenge),
        Ok(())
    );
    assert_eq!(
        ciphertext.verify_encryption_proof(&Plaintext::from_string("no"), &proof),
        Err(VerificationFailure::SecondCheck)
    );
}

#[test_log::test]
fn test_disjunctive_proof() {
    let mut rng = thread_rng();
    let keypair = fixed_keypair();
    let plaintexts = Plaintext::from_strings(&["red", "green", "blue"]);

    let (ciphertext, r) = keypair.pk.encrypt_return_r(&plaintexts[1], &mut rng).unwrap();
    let proof = ciphertext
        .generate_disjunctive_encryption_proof(&plaintexts, 1, &r, disjunctive_challenge, &mut rng)
        .unwrap();

    assert_eq!(
        ciphertext.verify_disjunctive_encryption_proof(&plaintexts, &proof, disjunctive_challenge),
        Ok(())
    );

    // Plaintext list and proof count must agree
    assert_eq!(
        ciphertext.verify_disjunctive_encryption_proof(
            &plaintexts[..2],
            &proof,
            disjunctive_challenge
        ),
        Err(VerificationFailure::ProofCountMismatch {
            expected: 2,
            found: 3
        })
    );

    // Altering any candidate breaks the matching branch
    for index in 0..plaintexts.len() {
        let mut altered = plaintexts.clone();
        altered[index] = Plaintext::from_string("purple");
        assert_eq!(
            ciphertext.verify_disjunctive_encryption_proof(&altered, &proof, disjunctive_challenge),
            Err(VerificationFailure::Branch {
                index,
                reason: Box::new(VerificationFailure::SecondCheck)
            })
        );
    }

    // The proof does not transfer to another ciphertext
    let other = keypair.pk.encrypt(&plaintexts[1], &mut rng).unwrap();
    assert!(other
        .verify_disjunctive_encryption_proof(&plaintexts, &proof, disjunctive_challenge)
        .is_err());
}

#[test]
fn test_disjunctive_proof_for_unlisted_plaintext_fails() {
    let mut rng = thread_rng();
    let keypair = fixed_keypair();
    let plaintexts = Plaintext::from_strings(&["red", "green", "blue"]);

    // Claiming index 0 for an encryption of "green" does not produce a valid proof
    let (ciphertext, r) = keypair.pk.encrypt_return_r(&plaintexts[1], &mut rng).unwrap();
    let proof = ciphertext
        .generate_disjunctive_encryption_proof(&plaintexts, 0, &r, disjunctive_challenge, &mut rng)
        .unwrap();
    assert_eq!(
        ciphertext.verify_disjunctive_encryption_proof(&plaintexts, &proof, disjunctive_challenge),
        Err(VerificationFailure::Branch {
            index: 0,
            reason: Box::new(VerificationFailure::SecondCheck)
        })
    );
}

#[test]
fn test_verified_decryption() {
    let mut rng = thread_rng();
    let keypair = fixed_keypair();
    let ciphertext = keypair
        .pk
        .encrypt_with_r(&Plaintext::from(MESSAGE), &BigNum::from(R))
        .unwrap();

    let (plaintext, proof) = keypair.sk.prove_decryption(&ciphertext, &mut rng).unwrap();
    assert_eq!(plaintext, Plaintext::from(MESSAGE));
    assert_eq!(ciphertext.verify_decryption_proof(&plaintext, &proof), Ok(()));
    assert_eq!(
        ciphertext.verify_decryption_proof(&Plaintext::from(MESSAGE + 1), &proof),
        Err(VerificationFailure::SecondCheck)
    );
}

#[test]
fn test_joint_key_decryption_with_factor_proofs() {
    let mut rng = thread_rng();
    let params = params();
    let trustees: Vec<KeyPair> = (0..3)
        .map(|_| params.generate_key_pair(&mut rng).unwrap())
        .collect();

    let joint = trustees[1..]
        .iter()
        .try_fold(trustees[0].pk.clone(), |acc, trustee| acc.multiply(&trustee.pk))
        .unwrap();

    let ciphertext = joint.encrypt(&Plaintext::from(42), &mut rng).unwrap();

    let mut factors = Vec::new();
    for trustee in &trustees {
        let (factor, proof) = trustee
            .sk
            .decryption_factor_and_proof(&ciphertext, fiat_shamir_challenge, &mut rng)
            .unwrap();
        assert_eq!(
            ciphertext.verify_decryption_factor(&factor, &proof, &trustee.pk, fiat_shamir_challenge),
            Ok(())
        );
        factors.push((factor, proof));
    }

    // A factor proof is bound to the trustee's own key
    let (factor, proof) = &factors[0];
    assert_eq!(
        ciphertext.verify_decryption_factor(factor, proof, &trustees[1].pk, fiat_shamir_challenge),
        Err(VerificationFailure::FirstCheck)
    );

    // An honest proof does not cover a substituted factor
    let forged = (factor * BigNum::from(4u32)).modulo(params.p()).unwrap();
    assert_eq!(
        ciphertext.verify_decryption_factor(&forged, proof, &trustees[0].pk, fiat_shamir_challenge),
        Err(VerificationFailure::SecondCheck)
    );

    let factors: Vec<BigNum> = factors.into_iter().map(|(factor, _)| factor).collect();
    assert_eq!(
        ciphertext.decrypt_with_factors(&factors).unwrap(),
        Plaintext::from(42)
    );
}

#[test]
fn test_verification_failure_propagates_as_error() {
    fn check(ciphertext: &Ciphertext, plaintext: &Plaintext, proof: &zkelgamal::ZKProof) -> zkelgamal::Result<()> {
        ciphertext.verify_encryption_proof(plaintext, proof)?;
        Ok(())
    }

    let mut rng = thread_rng();
    let keypair = fixed_keypair();
    let (ciphertext, proof) = keypair
        .pk
        .encrypt_with_proof(&Plaintext::from(7), &mut rng)
        .unwrap();

    assert_eq!(check(&ciphertext, &Plaintext::from(7), &proof), Ok(()));
    assert_eq!(
        check(&ciphertext, &Plaintext::from(8), &proof),
        Err(ElGamalError::VerificationFailed(VerificationFailure::SecondCheck))
    );
}

#[test]
fn test_compact_ciphertext_string() {
    let keypair = fixed_keypair();
    let ciphertext = keypair
        .pk
        .encrypt_with_r(&Plaintext::from(MESSAGE), &BigNum::from(R))
        .unwrap();

    let compact = ciphertext.to_string();
    assert_eq!(compact, format!("{EXPECTED_ALPHA},{EXPECTED_BETA}"));
    assert_eq!(
        Ciphertext::from_str_with_key(&compact, keypair.pk.clone()).unwrap(),
        ciphertext
    );
    assert!(matches!(
        Ciphertext::from_str_with_key(EXPECTED_ALPHA, keypair.pk),
        Err(ElGamalError::Parse(_))
    ));
}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use std::fmt::Debug;
    use zkelgamal::{
        CiphertextData, Commitment, CryptoSystem, DLogProof, PublicKey, SecretKey,
        ZKDisjunctiveProof, ZKProof,
    };

    fn round_trip<T: Serialize + DeserializeOwned + PartialEq + Debug>(value: &T) {
        let json = serde_json::to_string(value).unwrap();
        let restored: T = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, value, "{json}");
    }

    #[test]
    fn test_json_round_trips() {
        let mut rng = thread_rng();
        let keypair = fixed_keypair();
        let plaintexts = Plaintext::from_strings(&["a", "b"]);
        let (ciphertext, r) = keypair.pk.encrypt_return_r(&plaintexts[0], &mut rng).unwrap();

        round_trip::<CryptoSystem>(keypair.pk.params());
        round_trip::<PublicKey>(&keypair.pk);
        round_trip::<SecretKey>(&keypair.sk);
        round_trip::<KeyPair>(&keypair);
        round_trip::<Ciphertext>(&ciphertext);
        round_trip::<CiphertextData>(&ciphertext.data());

        let dlog: DLogProof = keypair.sk.prove_sk(dlog_challenge, &mut rng).unwrap();
        round_trip(&dlog);

        let zk: ZKProof = ciphertext
            .generate_encryption_proof(&r, fiat_shamir_challenge, &mut rng)
            .unwrap();
        round_trip::<Commitment>(&zk.commitment);
        round_trip(&zk);

        let disjunctive: ZKDisjunctiveProof = ciphertext
            .generate_disjunctive_encryption_proof(&plaintexts, 0, &r, disjunctive_challenge, &mut rng)
            .unwrap();
        round_trip(&disjunctive);
    }

    #[test]
    fn test_wire_shapes() {
        let keypair = fixed_keypair();
        let ciphertext = keypair
            .pk
            .encrypt_with_r(&Plaintext::from(MESSAGE), &BigNum::from(R))
            .unwrap();

        let json = serde_json::to_value(&keypair).unwrap();
        assert_eq!(json["pk"]["p"], P);
        assert_eq!(json["pk"]["q"], Q);
        assert_eq!(json["pk"]["g"], G);
        assert_eq!(json["pk"]["y"], EXPECTED_Y);
        assert_eq!(json["sk"]["x"], X);
        assert_eq!(json["sk"]["publicKey"], json["pk"]);

        let json = serde_json::to_value(&ciphertext).unwrap();
        assert_eq!(json["alpha"], EXPECTED_ALPHA);
        assert_eq!(json["beta"], EXPECTED_BETA);
        assert_eq!(json["pk"]["y"], EXPECTED_Y);
    }

    #[test]
    fn test_offline_verification_from_json() {
        let mut rng = thread_rng();
        let keypair = fixed_keypair();
        let plaintexts = Plaintext::from_strings(&["yes", "no"]);
        let (ciphertext, r) = keypair.pk.encrypt_return_r(&plaintexts[1], &mut rng).unwrap();
        let proof = ciphertext
            .generate_disjunctive_encryption_proof(&plaintexts, 1, &r, disjunctive_challenge, &mut rng)
            .unwrap();

        let published_ct = serde_json::to_string(&ciphertext).unwrap();
        let published_proof = serde_json::to_string(&proof).unwrap();

        // The verifier sees only the JSON artifacts
        let ciphertext: Ciphertext = serde_json::from_str(&published_ct).unwrap();
        let proof: ZKDisjunctiveProof = serde_json::from_str(&published_proof).unwrap();
        assert_eq!(
            ciphertext.verify_disjunctive_encryption_proof(&plaintexts, &proof, disjunctive_challenge),
            Ok(())
        );
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let bad = r#"{"p":"23","q":"11","g":"4","y":"12x"}"#;
        assert!(serde_json::from_str::<PublicKey>(bad).is_err());

        let hex = r#"{"p":"0x17","q":"11","g":"4","y":"2"}"#;
        let pk: PublicKey = serde_json::from_str(hex).unwrap();
        assert_eq!(pk.p(), &BigNum::from(23u32));
    }
}
