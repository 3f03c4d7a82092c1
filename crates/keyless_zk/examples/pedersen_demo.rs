//! Pedersen Commitment Walkthrough
//!
//! Single commitments, batching under one verifying key, batching across
//! verifying keys, and a KZG evaluation proof.
//! Run with: cargo run --example pedersen_demo --release

use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};
use keyless_zk::{
    batch_prove, batch_verify_multi_vk, fold_commitments, scalars_from_u64, setup, Basis,
    BatchVerifier, CombinationCoefficient, Fr, KzgSrs, Trapdoor,
};
use rand::rngs::OsRng;
use std::time::Instant;

fn main() {
    println!("=== Keyless ZK Pedersen Example ===\n");

    // Example 1: Single commitment and proof
    println!("1. Single Pedersen Commitment");

    let basis = Basis::random(2, &mut OsRng).unwrap();
    let (pks, vk) = setup(&[basis], None).unwrap();
    let values = scalars_from_u64(&[123, 456]);

    let commitment = pks[0].commit(&values).unwrap();
    let proof = pks[0].prove_knowledge(&values).unwrap();
    println!("   Commitment: {}", commitment.to_hex().unwrap());

    match vk.verify(&commitment, &proof) {
        Ok(()) => println!("   Verify: SUCCEEDED"),
        Err(e) => println!("   Verify: FAILED -> {}", e),
    }

    let tampered = commitment.scale(&Fr::from(987654321u64));
    match vk.verify(&tampered, &proof) {
        Ok(()) => println!("   Tampered verify: SUCCEEDED (should NOT happen!)"),
        Err(e) => println!("   Tampered verify: FAILED (as expected) -> {}", e),
    }

    // Example 2: Two vectors under one verifying key
    println!("\n2. Batch Under One Verifying Key");

    let bases = vec![
        Basis::random(2, &mut OsRng).unwrap(),
        Basis::random(2, &mut OsRng).unwrap(),
    ];
    let (pks, vk) = setup(&bases, None).unwrap();
    let values = vec![scalars_from_u64(&[10, 20]), scalars_from_u64(&[30, 40])];

    let (c_a, p_a) = pks[0].commit_and_prove(&values[0]).unwrap();
    let (c_b, p_b) = pks[1].commit_and_prove(&values[1]).unwrap();
    println!("   Verification (A): {:?}", vk.verify(&c_a, &p_a));
    println!("   Verification (B): {:?}", vk.verify(&c_b, &p_b));

    // Fixed for reproducibility; derive it with a Transcript in real use
    let coeff = CombinationCoefficient::from_u64(42).unwrap();
    let batch_proof = batch_prove(&pks, &values, &coeff).unwrap();
    let folded = fold_commitments(&[c_a, c_b], &coeff).unwrap();
    match vk.verify(&folded, &batch_proof) {
        Ok(()) => println!("   Batch verify (same VK): SUCCEEDED"),
        Err(e) => println!("   Batch verify (same VK): FAILED -> {}", e),
    }

    // Example 3: Independent setups sharing a trapdoor
    println!("\n3. Batch Across Verifying Keys");

    let trapdoor = Trapdoor::random(&mut OsRng);
    let (pk1, vk1) = setup(&[Basis::random(2, &mut OsRng).unwrap()], Some(&trapdoor)).unwrap();
    let (pk2, vk2) = setup(&[Basis::random(2, &mut OsRng).unwrap()], Some(&trapdoor)).unwrap();

    let (c1, p1) = pk1[0].commit_and_prove(&scalars_from_u64(&[11, 22])).unwrap();
    let (c2, p2) = pk2[0].commit_and_prove(&scalars_from_u64(&[33, 44])).unwrap();

    let coeff = CombinationCoefficient::from_u64(7).unwrap();
    match batch_verify_multi_vk(&[vk1, vk2], &[c1, c2], &[p1, p2], &coeff) {
        Ok(()) => println!("   Multi-VK batch: SUCCEEDED"),
        Err(e) => println!("   Multi-VK batch: FAILED -> {}", e),
    }

    let bad_p2 = p2.scale(&Fr::from(9999u64));
    match batch_verify_multi_vk(&[vk1, vk2], &[c1, c2], &[p1, bad_p2], &coeff) {
        Ok(()) => println!("   Multi-VK batch with bad proof: SUCCEEDED (should NOT happen!)"),
        Err(e) => println!("   Multi-VK batch with bad proof: FAILED (as expected) -> {}", e),
    }

    // Example 4: Many setups through the BatchVerifier
    println!("\n4. Batch Verifier (100 setups)");

    let mut verifier = BatchVerifier::new();
    for i in 0..100u64 {
        let (pks, vk) = setup(&[Basis::random(2, &mut OsRng).unwrap()], Some(&trapdoor)).unwrap();
        let (c, p) = pks[0].commit_and_prove(&scalars_from_u64(&[i, i * i])).unwrap();
        verifier.add(vk, c, p);
    }

    let start = Instant::now();
    let individual_valid = verifier
        .triples()
        .iter()
        .filter(|t| t.verify().is_ok())
        .count();
    let individual_time = start.elapsed();

    let result = verifier.verify_all_fiat_shamir().unwrap();
    println!(
        "   Individual: {} valid in {:?}",
        individual_valid, individual_time
    );
    println!(
        "   Batch:      {} valid in {}ms",
        result.valid_count(),
        result.verification_time_ms
    );

    // Example 5: KZG evaluation proof
    println!("\n5. KZG Polynomial Commitment");

    let srs = KzgSrs::new(8, &mut OsRng).unwrap();
    // f(X) = 5 + 2X + 3X²
    let f = DensePolynomial::from_coefficients_vec(scalars_from_u64(&[5, 2, 3]));
    let kzg_commitment = srs.commit(&f).unwrap();
    println!("   Commitment: {}", kzg_commitment.to_hex().unwrap());

    let opening = srs.open(&f, Fr::from(11u64)).unwrap();
    println!("   f(11) = {}", opening.value());
    match srs.verify(&kzg_commitment, &opening) {
        Ok(()) => println!("   Verification succeeded!"),
        Err(e) => println!("   Verification failed: {}", e),
    }

    println!("\n=== Done ===");
}
