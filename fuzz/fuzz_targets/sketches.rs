#![no_main]

use libfuzzer_sys::fuzz_target;
use stream_sketches::register::{MAX_PRECISION, MIN_PRECISION};
use stream_sketches::{OrderStatisticSketch, RegisterSketch, ShardedOrderStatisticSketch};
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // derive sketch parameters from the input itself
    let seed = wyhash(data, 0) as usize;
    let precision = MIN_PRECISION + seed % (MAX_PRECISION - MIN_PRECISION + 1);
    let num_splits = 1 + (seed >> 8) % 8;
    let k = num_splits * (1 + (seed >> 16) % 16);

    let mut loglog = RegisterSketch::loglog(precision).unwrap();
    let mut hll = RegisterSketch::hyperloglog(precision).unwrap();
    let mut kmv = OrderStatisticSketch::new(k).unwrap();
    let mut split = ShardedOrderStatisticSketch::new(k, num_splits).unwrap();

    for chunk in data.chunks(4) {
        loglog.insert(chunk);
        hll.insert(chunk);
        kmv.update_bytes(chunk);
        split.update_bytes(chunk);

        for estimate in [loglog.estimate(), hll.estimate(), kmv.estimate(), split.estimate()] {
            assert!(estimate.is_finite() && estimate >= 0.0);
        }
        assert!(!hll.is_empty());
        assert!(kmv.num_retained() <= k);
        assert!(split.num_retained() <= k);
    }
});
