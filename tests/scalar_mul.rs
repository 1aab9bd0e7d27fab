use bellpepper_core::{test_cs::TestConstraintSystem, ConstraintSystem};
use halo2curves::bn256::Fr;
use nonnative_ecc::{
  provider::{generators::OffsetGenerators, native::msm}, util_cs::SatisfyingConstraintSystem, AffinePoint, CurveParams,
  CurvePoint, FieldParams, ForeignFieldElement, MulConfig, ScalarMultiplier, Secp256k1,
  Secp256r1,
};
use num_bigint::{BigInt, RandBigInt};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

type Scalar<C> = ForeignFieldElement<Fr, <C as CurveParams>::Scalar>;

fn random_points<C: CurveParams>(rng: &mut ChaCha20Rng, n: usize) -> Vec<AffinePoint<C>> {
  let order = C::Scalar::modulus();
  (0..n)
    .map(|_| {
      let k = rng.gen_bigint_range(&BigInt::from(1u8), order);
      C::one().mul(&k).unwrap()
    })
    .collect()
}

fn random_scalars(rng: &mut ChaCha20Rng, n: usize, num_bits: usize) -> Vec<BigInt> {
  let bound = BigInt::from(1u8) << num_bits;
  (0..n)
    .map(|_| rng.gen_bigint_range(&BigInt::from(1u8), &bound))
    .collect()
}

fn alloc_inputs<C: CurveParams, CS: ConstraintSystem<Fr>>(
  cs: &mut CS,
  name: &str,
  points: &[AffinePoint<C>],
  scalars: &[BigInt],
) -> (Vec<CurvePoint<Fr, C>>, Vec<Scalar<C>>) {
  let points = points
    .iter()
    .enumerate()
    .map(|(i, p)| {
      CurvePoint::alloc(cs.namespace(|| format!("{name} point {i}")), || Ok(p.clone())).unwrap()
    })
    .collect();
  let scalars = scalars
    .iter()
    .enumerate()
    .map(|(i, k)| {
      ForeignFieldElement::alloc(cs.namespace(|| format!("{name} scalar {i}")), || {
        Ok(k.clone())
      })
      .unwrap()
    })
    .collect();
  (points, scalars)
}

fn test_batch_mul_with<C: CurveParams>(n: usize, num_bits: usize) {
  let mut rng = ChaCha20Rng::seed_from_u64(n as u64);
  let points = random_points::<C>(&mut rng, n);
  let scalars = random_scalars(&mut rng, n, num_bits);

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let mul = ScalarMultiplier::<Fr, C>::new(MulConfig {
    max_num_bits: Some(num_bits),
  });
  let r = mul.batch_mul(cs.namespace(|| "batch mul"), &p, &k, None).unwrap();

  assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
  assert_eq!(r.value(), msm(&points, &scalars));
}

#[test]
fn test_single_mul() {
  for (seed, num_bits) in [(1u64, 8usize), (2, 13), (3, 16)] {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let points = random_points::<Secp256k1>(&mut rng, 1);
    let scalars = random_scalars(&mut rng, 1, num_bits);

    let mut cs = TestConstraintSystem::<Fr>::new();
    let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
    let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig {
      max_num_bits: Some(num_bits),
    });
    let r = mul.single_mul(cs.namespace(|| "mul"), &p[0], &k[0]).unwrap();

    assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
    assert_eq!(r.value(), points[0].mul(&scalars[0]));
  }
}

#[test]
fn test_batch_mul_shapes() {
  // one quad, then a quad with a single, then a quad with a pair and a single
  for n in [1, 2, 3, 4, 5, 7] {
    test_batch_mul_with::<Secp256k1>(n, 10);
  }
  test_batch_mul_with::<Secp256r1>(6, 10);
}

#[test]
fn test_twin_and_quad_match_batch() {
  let num_bits = 12;
  let mut rng = ChaCha20Rng::seed_from_u64(42);
  let points = random_points::<Secp256r1>(&mut rng, 4);
  let scalars = random_scalars(&mut rng, 4, num_bits);
  let mul = ScalarMultiplier::<Fr, Secp256r1>::new(MulConfig {
    max_num_bits: Some(num_bits),
  });

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let twin = mul
    .twin_mul(cs.namespace(|| "twin"), &p[0], &k[0], &p[1], &k[1])
    .unwrap();
  let quad = mul
    .quad_mul(
      cs.namespace(|| "quad"),
      &[p[0].clone(), p[1].clone(), p[2].clone(), p[3].clone()],
      &[k[0].clone(), k[1].clone(), k[2].clone(), k[3].clone()],
    )
    .unwrap();

  assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
  assert_eq!(twin.value(), msm(&points[..2], &scalars[..2]));
  assert_eq!(quad.value(), msm(&points, &scalars));
}

#[test]
fn test_mixed_batch_mul() {
  let (num_bits, small_bits) = (14, 5);
  let mut rng = ChaCha20Rng::seed_from_u64(7);
  let big_points = random_points::<Secp256k1>(&mut rng, 2);
  let big_scalars = random_scalars(&mut rng, 2, num_bits);
  let small_points = random_points::<Secp256k1>(&mut rng, 3);
  let small_scalars = random_scalars(&mut rng, 3, small_bits);

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (bp, bk) = alloc_inputs(&mut cs, "big", &big_points, &big_scalars);
  let (sp, sk) = alloc_inputs(&mut cs, "small", &small_points, &small_scalars);
  let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig {
    max_num_bits: Some(num_bits),
  });
  let r = mul
    .mixed_batch_mul(cs.namespace(|| "mixed"), &bp, &bk, &sp, &sk, small_bits)
    .unwrap();

  assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
  let points = [big_points, small_points].concat();
  let scalars = [big_scalars, small_scalars].concat();
  assert_eq!(r.value(), msm(&points, &scalars));
}

#[test]
fn test_mixed_batch_mul_with_an_empty_group() {
  let num_bits = 9;
  let mut rng = ChaCha20Rng::seed_from_u64(8);
  let points = random_points::<Secp256k1>(&mut rng, 2);
  let scalars = random_scalars(&mut rng, 2, 4);
  let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig {
    max_num_bits: Some(num_bits),
  });

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let only_small = mul
    .mixed_batch_mul(cs.namespace(|| "only small"), &[], &[], &p, &k, 4)
    .unwrap();
  let only_big = mul
    .mixed_batch_mul(cs.namespace(|| "only big"), &p, &k, &[], &[], 4)
    .unwrap();

  assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
  assert_eq!(only_small.value(), msm(&points, &scalars));
  assert_eq!(only_big.value(), msm(&points, &scalars));
}

#[test]
fn test_scalar_wider_than_digits_is_unsatisfiable() {
  let mut rng = ChaCha20Rng::seed_from_u64(9);
  let points = random_points::<Secp256k1>(&mut rng, 1);
  let scalars = vec![BigInt::from(1000u32)];

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig {
    max_num_bits: Some(8),
  });
  let _ = mul.single_mul(cs.namespace(|| "mul"), &p[0], &k[0]);
  assert!(!cs.is_satisfied());
}

#[test]
fn test_zero_scalar_is_unsatisfiable() {
  let mut rng = ChaCha20Rng::seed_from_u64(10);
  let points = random_points::<Secp256k1>(&mut rng, 1);
  let scalars = vec![BigInt::from(0u8)];

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig {
    max_num_bits: Some(8),
  });
  let _ = mul.single_mul(cs.namespace(|| "mul"), &p[0], &k[0]);
  assert!(!cs.is_satisfied());
}

#[test]
fn test_unit_scalar() {
  let mut rng = ChaCha20Rng::seed_from_u64(12);
  for num_bits in [1, 8] {
    let points = random_points::<Secp256r1>(&mut rng, 1);
    let scalars = vec![BigInt::from(1u8)];

    let mut cs = TestConstraintSystem::<Fr>::new();
    let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
    let mul = ScalarMultiplier::<Fr, Secp256r1>::new(MulConfig {
      max_num_bits: Some(num_bits),
    });
    let r = mul.single_mul(cs.namespace(|| "mul"), &p[0], &k[0]).unwrap();

    assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
    assert_eq!(r.value(), Some(points[0].clone()));
  }
}

#[test]
fn test_point_equal_to_offset_is_unsatisfiable() {
  let num_bits = 8;
  let offset = OffsetGenerators::<Secp256k1>::new(num_bits).unwrap();
  let points = vec![offset.generator];
  let scalars = vec![BigInt::from(3u8)];

  let mut cs = TestConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig {
    max_num_bits: Some(num_bits),
  });
  let _ = mul.single_mul(cs.namespace(|| "mul"), &p[0], &k[0]);
  assert!(!cs.is_satisfied());
}

#[test]
fn test_full_width_single_mul() {
  let mut rng = ChaCha20Rng::seed_from_u64(11);
  let points = random_points::<Secp256k1>(&mut rng, 1);
  let order = <Secp256k1 as CurveParams>::Scalar::modulus();
  let scalars = vec![order - 1u8];

  let mut cs = SatisfyingConstraintSystem::<Fr>::new();
  let (p, k) = alloc_inputs(&mut cs, "input", &points, &scalars);
  let mul = ScalarMultiplier::<Fr, Secp256k1>::new(MulConfig::default());
  let r = mul.single_mul(cs.namespace(|| "mul"), &p[0], &k[0]).unwrap();

  assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
  assert_eq!(r.value(), Some(points[0].neg()));
}
