//! Unit tests for the bounded channel

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::application::cancel::{cancel_pair, CancelToken};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready, assert_ready_err, assert_ready_ok, task};

    #[test]
    fn test_zero_capacity_rejected() {
        let result = BoundedChannel::<i64>::new(0);
        assert_eq!(result.err(), Some(ChannelError::ZeroCapacity));
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let channel = BoundedChannel::new(3).unwrap();
        let token = CancelToken::never();

        for i in 0..3 {
            channel.send(i, &token).await.unwrap();
        }
        assert_eq!(channel.state(), ChannelState::Full);

        for expected in 0..3 {
            assert_eq!(channel.receive(&token).await.unwrap(), expected);
        }
        assert_eq!(channel.state(), ChannelState::Empty);
    }

    #[test]
    fn test_send_blocks_when_full_until_receive() {
        let channel = BoundedChannel::new(2).unwrap();
        let token = CancelToken::never();
        channel.try_send(1).unwrap();
        channel.try_send(2).unwrap();
        assert_eq!(channel.try_send(3), Err(3));

        let mut send = task::spawn(channel.send(3, &token));
        assert_pending!(send.poll());
        assert_eq!(channel.len(), 2);

        assert_eq!(channel.try_receive(), Some(1));
        assert!(send.is_woken());
        assert_ready_ok!(send.poll());
        drop(send);

        assert_eq!(channel.try_receive(), Some(2));
        assert_eq!(channel.try_receive(), Some(3));
        assert_eq!(channel.stats().send_waits, 1);
    }

    #[test]
    fn test_receive_blocks_when_empty_until_send() {
        let channel = BoundedChannel::new(2).unwrap();
        let token = CancelToken::never();

        let mut receive = task::spawn(channel.receive(&token));
        assert_pending!(receive.poll());

        channel.try_send(42).unwrap();
        assert!(receive.is_woken());
        assert_eq!(assert_ready_ok!(receive.poll()), 42);
        drop(receive);

        let stats = channel.stats();
        assert_eq!(stats.receive_waits, 1);
        assert!(stats.observed_empty);
    }

    #[test]
    fn test_interrupted_send_leaves_channel_intact() {
        let channel = BoundedChannel::new(1).unwrap();
        let (handle, token) = cancel_pair();
        channel.try_send(7).unwrap();

        let mut send = task::spawn(channel.send(8, &token));
        assert_pending!(send.poll());

        handle.cancel();
        assert!(send.is_woken());
        let err = assert_ready_err!(send.poll());
        assert_eq!(err, ChannelError::Interrupted(Operation::Send));
        drop(send);

        // The rejected item never entered the channel
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.try_receive(), Some(7));
        assert_eq!(channel.try_receive(), None);
        assert_eq!(channel.stats().sent, 1);
    }

    #[test]
    fn test_interrupted_receive_removes_nothing() {
        let channel = BoundedChannel::<i64>::new(2).unwrap();
        let (handle, token) = cancel_pair();

        let mut receive = task::spawn(channel.receive(&token));
        assert_pending!(receive.poll());
        handle.cancel();
        let err = assert_ready_err!(receive.poll());
        assert_eq!(err, ChannelError::Interrupted(Operation::Receive));
        drop(receive);

        // Other users keep working normally
        let other = CancelToken::never();
        let mut send = task::spawn(channel.send(5, &other));
        assert_ready_ok!(send.poll());
        drop(send);
        assert_eq!(channel.try_receive(), Some(5));
    }

    #[test]
    fn test_wakeup_forwarded_when_waiter_gives_up() {
        // Two blocked senders; the one woken first is cancelled before it can use the space.
        let channel = BoundedChannel::new(1).unwrap();
        let (handle, cancelled) = cancel_pair();
        let never = CancelToken::never();
        channel.try_send(0).unwrap();

        let mut first = task::spawn(channel.send(1, &cancelled));
        let mut second = task::spawn(channel.send(2, &never));
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        assert_eq!(channel.try_receive(), Some(0));
        handle.cancel();
        assert_ready_err!(first.poll());
        drop(first);

        assert!(second.is_woken());
        assert_ready_ok!(second.poll());
        drop(second);
        assert_eq!(channel.try_receive(), Some(2));
        assert_eq!(channel.try_receive(), None);
    }

    #[test]
    fn test_state_transitions() {
        let channel = BoundedChannel::new(3).unwrap();
        assert_eq!(channel.state(), ChannelState::Empty);
        channel.try_send(1).unwrap();
        assert_eq!(channel.state(), ChannelState::Partial);
        channel.try_send(2).unwrap();
        channel.try_send(3).unwrap();
        assert_eq!(channel.state(), ChannelState::Full);
        assert!(channel.stats().observed_full);
        channel.try_receive();
        assert_eq!(channel.state(), ChannelState::Partial);
    }

    #[test]
    fn test_ready_receive_does_not_wait() {
        let channel = BoundedChannel::new(1).unwrap();
        let token = CancelToken::never();
        channel.try_send(3).unwrap();
        let mut receive = task::spawn(channel.receive(&token));
        let value = assert_ready!(receive.poll());
        assert_eq!(value, Ok(3));
        drop(receive);
        assert_eq!(channel.stats().receive_waits, 0);
    }

    #[tokio::test]
    async fn test_draining_receive_is_not_an_empty_observation() {
        let channel = BoundedChannel::new(2).unwrap();
        let token = CancelToken::never();
        channel.try_send(1).unwrap();
        channel.try_send(2).unwrap();

        assert_eq!(channel.receive(&token).await, Ok(1));
        assert_eq!(channel.receive(&token).await, Ok(2));
        // Left EMPTY, but no receive ever found it EMPTY
        let stats = channel.stats();
        assert!(channel.is_empty());
        assert!(!stats.observed_empty);
        assert_eq!(stats.receive_waits, 0);

        assert_eq!(channel.try_receive(), None);
        assert!(channel.stats().observed_empty);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_producers_many_consumers_no_loss_no_duplicates() {
        const PRODUCERS: i64 = 4;
        const PER_PRODUCER: i64 = 250;
        const CAPACITY: usize = 3;

        let channel = Arc::new(BoundedChannel::new(CAPACITY).unwrap());

        let mut producers = vec![];
        for p in 0..PRODUCERS {
            let channel = Arc::clone(&channel);
            producers.push(tokio::spawn(async move {
                let token = CancelToken::never();
                let mut last_len = 0;
                for i in 0..PER_PRODUCER {
                    channel.send(p * PER_PRODUCER + i, &token).await.unwrap();
                    last_len = last_len.max(channel.len());
                }
                last_len
            }));
        }

        let mut consumers = vec![];
        for _ in 0..PRODUCERS {
            let channel = Arc::clone(&channel);
            consumers.push(tokio::spawn(async move {
                let token = CancelToken::never();
                let mut received = Vec::new();
                for _ in 0..PER_PRODUCER {
                    received.push(channel.receive(&token).await.unwrap());
                }
                received
            }));
        }

        for producer in producers {
            assert!(producer.await.unwrap() <= CAPACITY);
        }

        let mut all = Vec::new();
        for consumer in consumers {
            let received = consumer.await.unwrap();
            // Per-producer values arrive in send order at any single consumer
            for p in 0..PRODUCERS {
                let from_p: Vec<i64> = received
                    .iter()
                    .copied()
                    .filter(|v| v / PER_PRODUCER == p)
                    .collect();
                assert!(from_p.windows(2).all(|w| w[0] < w[1]));
            }
            all.extend(received);
        }

        let unique: HashSet<i64> = all.iter().copied().collect();
        assert_eq!(all.len(), (PRODUCERS * PER_PRODUCER) as usize);
        assert_eq!(unique.len(), all.len());
        assert!(channel.is_empty());

        let stats = channel.stats();
        assert!(stats.high_water <= CAPACITY);
        assert_eq!(stats.sent, stats.received);
    }
}
