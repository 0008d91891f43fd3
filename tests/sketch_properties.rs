use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use stream_sketches::register::{MAX_PRECISION, MIN_PRECISION};
use stream_sketches::{
    HyperLogLog, LogLog, OrderStatisticSketch, RegisterSketch, ShardedOrderStatisticSketch,
    SketchError, Variant,
};
use test_case::test_case;

#[test]
fn test_fresh_hyperloglog_estimates_zero() {
    for precision in MIN_PRECISION..=MAX_PRECISION {
        let sketch = RegisterSketch::hyperloglog(precision).unwrap();
        assert_eq!(sketch.estimate(), 0.0, "precision {precision}");
    }
}

#[test]
fn test_fresh_loglog_estimate_is_bias_constant() {
    for precision in MIN_PRECISION..=MAX_PRECISION {
        let sketch = RegisterSketch::loglog(precision).unwrap();
        let m = (1usize << precision) as f64;
        assert_eq!(sketch.estimate(), 0.39701 * m, "precision {precision}");
    }
}

#[test_case(LogLog.into(); "loglog")]
#[test_case(HyperLogLog.into(); "hyperloglog")]
fn test_registers_are_monotone(variant: Variant) {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut sketch = RegisterSketch::new(variant, 6).unwrap();
    let mut previous = sketch.registers().to_vec();
    for _ in 0..5000 {
        sketch.update(rng.gen());
        let current = sketch.registers();
        assert!(previous.iter().zip(current).all(|(old, new)| new >= old));
        previous = current.to_vec();
    }
}

#[test_case(LogLog.into(), 4)]
#[test_case(LogLog.into(), 16)]
#[test_case(HyperLogLog.into(), 4)]
#[test_case(HyperLogLog.into(), 10)]
#[test_case(HyperLogLog.into(), 16)]
fn test_register_sketches_are_deterministic(variant: Variant, precision: usize) {
    let mut values: Vec<u64> = (0..20_000).collect();
    let mut lhs = RegisterSketch::new(variant, precision).unwrap();
    for &v in &values {
        lhs.update(v);
    }

    // same multiset of values in another order gives the same registers
    values.shuffle(&mut StdRng::seed_from_u64(99));
    let mut rhs = RegisterSketch::new(variant, precision).unwrap();
    for &v in &values {
        rhs.update(v);
    }

    assert_eq!(lhs.registers(), rhs.registers());
    assert_eq!(lhs.estimate(), rhs.estimate());
}

#[test]
fn test_reupdate_keeps_registers() {
    let mut sketch = RegisterSketch::hyperloglog(10).unwrap();
    for i in 0..3000 {
        sketch.update(i);
    }
    let registers = sketch.registers().to_vec();
    for i in (0..3000).rev() {
        sketch.update(i);
    }
    assert_eq!(sketch.registers(), registers.as_slice());
}

#[test_case(10_000)]
#[test_case(20_000)]
#[test_case(30_000)]
#[test_case(50_000)]
#[test_case(90_000)]
fn test_hyperloglog_p14_accuracy(n: u64) {
    let mut sketch = RegisterSketch::hyperloglog(14).unwrap();
    for i in 0..n {
        sketch.update(i);
    }
    let relative_error = (sketch.estimate() - n as f64).abs() / n as f64;
    assert!(relative_error < 0.05, "estimate {} for {n}", sketch.estimate());
}

#[test]
fn test_hyperloglog_p4_small_stream() {
    let mut sketch = RegisterSketch::hyperloglog(4).unwrap();
    for i in 0..100 {
        sketch.update(i);
    }
    let estimate = sketch.estimate();
    assert!((60.0..=160.0).contains(&estimate), "estimate {estimate}");
}

#[test]
fn test_kmv_small_stream_is_exact() {
    let mut sketch = OrderStatisticSketch::new(10).unwrap();
    for value in ["apple", "banana", "cherry", "date", "elderberry"] {
        sketch.update(value);
    }
    assert_eq!(sketch.estimate(), 5.0);

    sketch.update("fig");
    assert_eq!(sketch.num_retained(), 6);
    assert_eq!(sketch.estimate(), 6.0);

    sketch.update("apple");
    assert_eq!(sketch.estimate(), 6.0);
}

#[test]
fn test_kmv_retained_never_exceeds_k() {
    let mut sketch = OrderStatisticSketch::new(10).unwrap();
    for i in 0..500 {
        sketch.update(&format!("element-{i}"));
        assert!(sketch.num_retained() <= 10);
    }
    assert_eq!(sketch.num_retained(), 10);
}

#[test]
fn test_sharded_kmv_divisibility() {
    assert!(matches!(
        ShardedOrderStatisticSketch::new(401, 5),
        Err(SketchError::InvalidArgument(_))
    ));
    let sketch = ShardedOrderStatisticSketch::new(400, 5).unwrap();
    assert_eq!(sketch.num_splits(), 5);
    assert_eq!(sketch.shard_capacity(), 80);
}

#[test]
fn test_kmv_and_sharded_kmv_on_shuffled_stream() {
    let n: usize = 10_000;
    let trials: u32 = 8;
    let mut rng = StdRng::seed_from_u64(7);
    let mut stream: Vec<String> = (0..3)
        .flat_map(|_| (0..n).map(|i| i.to_string()))
        .collect();

    let mut kmv_total = 0.0;
    let mut split_total = 0.0;
    for _ in 0..trials {
        stream.shuffle(&mut rng);
        let mut kmv = OrderStatisticSketch::new(400).unwrap();
        let mut split = ShardedOrderStatisticSketch::new(400, 5).unwrap();
        for item in &stream {
            kmv.update(item);
            split.update(item);
        }
        kmv_total += kmv.estimate();
        split_total += split.estimate();
    }

    for (name, total) in [("kmv", kmv_total), ("split kmv", split_total)] {
        let mean = total / f64::from(trials);
        let relative_error = (mean - n as f64).abs() / n as f64;
        assert!(relative_error < 0.15, "{name} mean estimate {mean}");
    }
}

#[test]
fn test_estimates_are_finite_and_non_negative() {
    let mut hll = RegisterSketch::hyperloglog(4).unwrap();
    let mut loglog = RegisterSketch::loglog(4).unwrap();
    let mut kmv = OrderStatisticSketch::new(1).unwrap();
    let mut split = ShardedOrderStatisticSketch::new(3, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10_000 {
        let value: u64 = rng.gen();
        hll.update(value);
        loglog.update(value);
        kmv.update_bytes(&value.to_le_bytes());
        split.update_bytes(&value.to_le_bytes());
        for estimate in [hll.estimate(), loglog.estimate(), kmv.estimate(), split.estimate()] {
            assert!(estimate.is_finite() && estimate >= 0.0);
        }
    }
}
