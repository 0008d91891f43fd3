use stream_sketches::{OrderStatisticSketch, RegisterSketch, ShardedOrderStatisticSketch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stream_sketches=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let words: Vec<String> = (0..50_000).map(|i| format!("word-{}", i % 20_000)).collect();

    let mut loglog = RegisterSketch::loglog(12).unwrap();
    let mut hll = RegisterSketch::hyperloglog(12).unwrap();
    let mut kmv = OrderStatisticSketch::new(1024).unwrap();
    let mut split = ShardedOrderStatisticSketch::new(1024, 8).unwrap();
    for word in &words {
        loglog.insert(word.as_str());
        hll.insert(word.as_str());
        kmv.update(word);
        split.update(word);
    }

    println!("stream length = {}, distinct = 20000", words.len());
    println!("{:?}", loglog);
    println!("{:?}", hll);
    println!("kmv estimate = {:.2}", kmv.estimate());
    println!("split kmv estimate = {:.2}", split.estimate());
}
