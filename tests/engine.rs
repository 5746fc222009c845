//! End-to-end properties of the proof engine: completeness, soundness,
//! tamper resistance, key binding across statement families, batch
//! behavior, and transport-encoding round trips.

use ed25519_dalek::{Signer, SigningKey};
use rsa::RsaPrivateKey;
use zk_proof_engine::{
    BatchProof, DataEvaluation, Proof, ProofError, RewardedRecord, ZebraLancerStatement,
    ZebraLancerWitness, encrypt_record, generate_proof_batch_mask, generate_proof_echain,
    generate_proof_mask, generate_proof_zebralancer, generate_proof_zebralancer_rewarding,
    transport_tags, verify_proof_batch_mask, verify_proof_echain, verify_proof_mask,
    verify_proof_zebralancer, verify_proof_zebralancer_rewarding,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn credential() -> (ZebraLancerStatement, ZebraLancerWitness) {
    let sk = SigningKey::from_bytes(&[42u8; 32]);
    let master = SigningKey::from_bytes(&[17u8; 32]);
    let pk = sk.verifying_key();
    let cert = master.sign(pk.as_bytes());

    let prefix = b"task-7".to_vec();
    let msg = b"submission payload".to_vec();
    let sk_bytes = sk.to_keypair_bytes().to_vec();
    let (t1, t2) = transport_tags(&prefix, &msg, &sk_bytes).unwrap();

    (
        ZebraLancerStatement {
            prefix,
            msg,
            mpk: master.verifying_key().to_bytes().to_vec(),
            t1,
            t2,
        },
        ZebraLancerWitness {
            sk: sk_bytes,
            pk: pk.to_bytes().to_vec(),
            cert: cert.to_bytes().to_vec(),
        },
    )
}

#[test]
fn batch_equivalence_for_small_counts() {
    init_tracing();
    for count in [1usize, 2, 10] {
        let values: Vec<u64> = (0..count as u64).map(|i| 20 + i * 10).collect();
        let masks: Vec<u64> = (0..count as u64).map(|i| 2000 + i * 1000).collect();
        let masked: Vec<u64> = values.iter().zip(&masks).map(|(v, m)| v + m).collect();

        let package = generate_proof_batch_mask(&values, &masks, &masked).unwrap();
        assert_eq!(package.proof.count(), count);
        assert!(verify_proof_batch_mask(
            &masked,
            count,
            &package.proof,
            &package.verify_key
        ));

        let mut wrong = masked.clone();
        wrong[0] += 1;
        assert!(!verify_proof_batch_mask(
            &wrong,
            count,
            &package.proof,
            &package.verify_key
        ));
    }
}

#[test]
fn batch_is_order_sensitive() {
    init_tracing();
    // Permuting values alone breaks the index-for-index pairing, so the
    // witness no longer satisfies the folded statement.
    let values = [20u64, 30];
    let masks = [2000u64, 3000];
    let masked = [2020u64, 3030];
    let permuted = [30u64, 20];

    let err = generate_proof_batch_mask(&permuted, &masks, &masked).unwrap_err();
    assert!(matches!(err, ProofError::UnsatisfiedConstraint));
}

#[test]
fn batch_count_must_match_recorded_count() {
    init_tracing();
    let package = generate_proof_batch_mask(&[1, 2], &[10, 20], &[11, 22]).unwrap();

    // Supplying a different count than the proof records fails before any
    // cryptographic work.
    assert!(!verify_proof_batch_mask(
        &[11, 22, 33],
        3,
        &package.proof,
        &package.verify_key
    ));
    assert!(!verify_proof_batch_mask(
        &[11],
        1,
        &package.proof,
        &package.verify_key
    ));
}

#[test]
fn batch_proof_survives_its_byte_encoding() {
    init_tracing();
    let package = generate_proof_batch_mask(&[5, 6], &[50, 60], &[55, 66]).unwrap();
    let decoded = BatchProof::from_bytes(&package.proof.to_bytes()).unwrap();
    assert!(verify_proof_batch_mask(
        &[55, 66],
        2,
        &decoded,
        &package.verify_key
    ));
}

#[test]
fn proofs_do_not_cross_verify_between_families() {
    init_tracing();
    let mask = generate_proof_mask(24, 25, 49).unwrap();
    let echain = generate_proof_echain(0, 25, 100).unwrap();

    // Proof under key A, checked under key B from a different family.
    assert!(!verify_proof_mask(49, &mask.proof, &echain.verify_key));
    assert!(!verify_proof_echain(
        DataEvaluation { add: 175, minus: 25 },
        &echain.proof,
        &mask.verify_key
    ));
}

#[test]
fn batch_keys_are_count_specific() {
    init_tracing();
    let two = generate_proof_batch_mask(&[1, 2], &[10, 20], &[11, 22]).unwrap();
    let three = generate_proof_batch_mask(&[1, 2, 3], &[10, 20, 30], &[11, 22, 33]).unwrap();

    let foreign = BatchProof::new(two.proof.proof().clone(), 3);
    assert!(!verify_proof_batch_mask(
        &[11, 22, 33],
        3,
        &foreign,
        &three.verify_key
    ));
}

#[test]
fn single_byte_tamper_invalidates_proof() {
    init_tracing();
    let package = generate_proof_mask(24, 25, 49).unwrap();
    let bytes = package.proof.as_bytes();

    for position in [0, bytes.len() / 2, bytes.len() - 1] {
        let mut tampered = bytes.to_vec();
        tampered[position] ^= 0x01;
        let tampered = Proof::from_bytes(tampered);
        assert!(
            !verify_proof_mask(49, &tampered, &package.verify_key),
            "flip at byte {position} still verified"
        );
    }
}

#[test]
fn zebralancer_credential_round_trip() {
    init_tracing();
    let (statement, witness) = credential();
    let package = generate_proof_zebralancer(&statement, &witness).unwrap();
    assert!(verify_proof_zebralancer(
        &statement,
        &package.proof,
        &package.verify_key
    ));

    // Same proof against a different task message must fail: the message
    // bytes are pinned into the public inputs.
    let mut other = statement.clone();
    other.msg = b"different payload".to_vec();
    assert!(!verify_proof_zebralancer(
        &other,
        &package.proof,
        &package.verify_key
    ));
}

#[test]
fn zebralancer_rejects_uncertified_worker() {
    init_tracing();
    let (statement, mut witness) = credential();
    let rogue = SigningKey::from_bytes(&[99u8; 32]);
    witness.cert = rogue.sign(&witness.pk).to_bytes().to_vec();

    let err = generate_proof_zebralancer(&statement, &witness).unwrap_err();
    assert!(matches!(err, ProofError::UnsatisfiedConstraint));
}

#[test]
fn zebralancer_rejects_malformed_statement_shapes() {
    init_tracing();
    let (mut statement, witness) = credential();
    statement.t1.pop();

    let err = generate_proof_zebralancer(&statement, &witness).unwrap_err();
    assert!(matches!(err, ProofError::MalformedStatement(_)));
}

#[test]
fn rewarding_round_trip_and_score_binding() {
    init_tracing();
    let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let public_key = private_key.to_public_key();

    let records = vec![
        RewardedRecord {
            raw: b"record one".to_vec(),
            quality: 100,
        },
        RewardedRecord {
            raw: b"record two".to_vec(),
            quality: 90,
        },
    ];
    let ciphertexts: Vec<Vec<u8>> = records
        .iter()
        .map(|r| encrypt_record(&public_key, &r.raw).unwrap())
        .collect();

    let package = generate_proof_zebralancer_rewarding(
        0,
        25,
        &records,
        &ciphertexts,
        &public_key,
        &private_key,
    )
    .unwrap();

    let evaluations = vec![
        DataEvaluation { add: 175, minus: 25 },
        DataEvaluation { add: 165, minus: 15 },
    ];
    assert!(verify_proof_zebralancer_rewarding(
        &evaluations,
        &ciphertexts,
        &package.proof,
        &package.verify_key
    ));

    // Inflated score for the second record.
    let inflated = vec![
        DataEvaluation { add: 175, minus: 25 },
        DataEvaluation { add: 166, minus: 15 },
    ];
    assert!(!verify_proof_zebralancer_rewarding(
        &inflated,
        &ciphertexts,
        &package.proof,
        &package.verify_key
    ));
}

#[test]
fn rewarding_rejects_foreign_ciphertext() {
    init_tracing();
    let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let public_key = private_key.to_public_key();

    let records = vec![RewardedRecord {
        raw: b"actual record".to_vec(),
        quality: 100,
    }];
    // Published ciphertext encrypts something else.
    let ciphertexts = vec![encrypt_record(&public_key, b"something else").unwrap()];

    let err = generate_proof_zebralancer_rewarding(
        0,
        25,
        &records,
        &ciphertexts,
        &public_key,
        &private_key,
    )
    .unwrap_err();
    assert!(matches!(err, ProofError::UnsatisfiedConstraint));
}

#[test]
fn rewarding_checks_record_arity() {
    init_tracing();
    let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let public_key = private_key.to_public_key();

    let records = vec![RewardedRecord {
        raw: b"one".to_vec(),
        quality: 10,
    }];
    let err =
        generate_proof_zebralancer_rewarding(0, 1, &records, &[], &public_key, &private_key)
            .unwrap_err();
    assert!(matches!(err, ProofError::ArityMismatch { expected: 1, got: 0 }));
}

#[test]
fn packages_serialize_as_json_transport() {
    init_tracing();
    let package = generate_proof_mask(24, 25, 49).unwrap();
    let json = serde_json::to_string(&package).unwrap();
    let decoded: zk_proof_engine::ProofPackage = serde_json::from_str(&json).unwrap();
    assert!(verify_proof_mask(49, &decoded.proof, &decoded.verify_key));
}
