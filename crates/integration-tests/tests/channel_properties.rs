//! Bounded channel properties under real parallelism

use simsync_core::application::{BoundedChannel, CancelToken, Consumer, Producer};
use simsync_core::port::progress::mocks::RecordingProgress;
use simsync_core::port::{NoPacer, RandomPacer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_invariant_holds_at_every_sample() {
    for capacity in [1, 2, 5, 16] {
        let channel = Arc::new(BoundedChannel::new(capacity).unwrap());
        let done = Arc::new(AtomicBool::new(false));

        let sampler = {
            let channel = Arc::clone(&channel);
            let done = Arc::clone(&done);
            tokio::spawn(async move {
                let mut samples = 0_u64;
                while !done.load(Ordering::SeqCst) {
                    assert!(channel.len() <= capacity);
                    samples += 1;
                    tokio::task::yield_now().await;
                }
                samples
            })
        };

        let progress = Arc::new(RecordingProgress::new());
        let producer = Producer::new("P", channel.clone(), Arc::new(NoPacer), progress.clone());
        let consumer = Consumer::new("C", channel.clone(), Arc::new(NoPacer), progress);
        let token = CancelToken::never();

        let (sent, received) =
            tokio::join!(producer.run(2_000, &token), consumer.run(2_000, &token));
        done.store(true, Ordering::SeqCst);
        assert!(sampler.await.unwrap() > 0);

        assert_eq!(sent.handled(), 2_000);
        assert_eq!(received.items, (0..2_000).collect::<Vec<_>>());
        assert!(channel.stats().high_water <= capacity);
        assert!(channel.is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_liveness_for_small_runs() {
    for capacity in 1..=4 {
        for n in 0..=12 {
            let channel = Arc::new(BoundedChannel::new(capacity).unwrap());
            let progress = Arc::new(RecordingProgress::new());
            let producer = Producer::new(
                "P",
                channel.clone(),
                Arc::new(RandomPacer::new(Duration::from_millis(2))),
                progress.clone(),
            );
            let consumer = Consumer::new(
                "C",
                channel.clone(),
                Arc::new(RandomPacer::new(Duration::from_millis(2))),
                progress,
            );

            let run = async move {
                let token = CancelToken::never();
                let producer_task = tokio::spawn(async move { producer.run(n, &token).await });
                let token = CancelToken::never();
                let consumer_task = tokio::spawn(async move { consumer.run(n, &token).await });
                (producer_task.await.unwrap(), consumer_task.await.unwrap())
            };

            let (_, received) = tokio::time::timeout(Duration::from_secs(10), run)
                .await
                .unwrap_or_else(|_| panic!("deadlock at capacity {capacity}, n {n}"));
            assert_eq!(received.items, (0..n as i64).collect::<Vec<_>>());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_producers_two_consumers_share_one_channel() {
    let channel = Arc::new(BoundedChannel::new(3).unwrap());
    let progress = Arc::new(RecordingProgress::new());

    let mut producers = vec![];
    for (name, range) in [("P1", 0..100), ("P2", 100..200)] {
        let producer = Producer::new(name, channel.clone(), Arc::new(NoPacer), progress.clone());
        producers.push(tokio::spawn(async move {
            producer.run_values(range, &CancelToken::never()).await
        }));
    }
    let mut consumers = vec![];
    for name in ["C1", "C2"] {
        let consumer = Consumer::new(name, channel.clone(), Arc::new(NoPacer), progress.clone());
        consumers.push(tokio::spawn(async move {
            consumer.run(100, &CancelToken::never()).await
        }));
    }

    for producer in producers {
        assert_eq!(producer.await.unwrap().handled(), 100);
    }
    let mut all = vec![];
    for consumer in consumers {
        all.extend(consumer.await.unwrap().items);
    }
    all.sort_unstable();
    assert_eq!(all, (0..200).collect::<Vec<_>>());
}
