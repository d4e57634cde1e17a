// Two-phase simulation: all workloads, then producer/consumer
//
// Phase order is a hard barrier. The producer/consumer phase never starts before
// every workload unit has ended.

use crate::application::cancel::CancelToken;
use crate::application::channel::{check_capacity, BoundedChannel, ChannelError};
use crate::application::constants::*;
use crate::application::roles::{Consumer, Producer, RoleReport};
use crate::application::runner::WorkloadRunner;
use crate::domain::{ChannelStats, RunReport, WorkloadDescriptor};
use crate::error::Result;
use crate::port::{
    BurstExecutor, Pacer, Phase, ProgressEvent, ProgressSink, RandomPacer, SleepBurst,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Simulation settings
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub burst_unit: Duration,
    pub capacity: usize,
    pub items: usize,
    pub max_pause: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            burst_unit: DEFAULT_BURST_UNIT,
            capacity: DEFAULT_CHANNEL_CAPACITY,
            items: DEFAULT_ITEM_COUNT,
            max_pause: DEFAULT_MAX_PAUSE,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> std::result::Result<(), ChannelError> {
        check_capacity(self.capacity)
    }
}

/// Everything observed during one simulation
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub workloads: RunReport,
    pub producer: RoleReport,
    pub consumer: RoleReport,
    pub channel: ChannelStats,
}

/// Two-phase simulation service
pub struct Simulation {
    config: SimulationConfig,
    burst: Arc<dyn BurstExecutor>,
    producer_pacer: Arc<dyn Pacer>,
    consumer_pacer: Arc<dyn Pacer>,
    progress: Arc<dyn ProgressSink>,
}

impl Simulation {
    /// Create a simulation with sleep bursts and random pacing
    pub fn new(config: SimulationConfig, progress: Arc<dyn ProgressSink>) -> Self {
        let burst: Arc<dyn BurstExecutor> = Arc::new(SleepBurst::new(config.burst_unit));
        let producer_pacer: Arc<dyn Pacer> = Arc::new(RandomPacer::new(config.max_pause));
        let consumer_pacer: Arc<dyn Pacer> = Arc::new(RandomPacer::new(config.max_pause));
        Self {
            config,
            burst,
            producer_pacer,
            consumer_pacer,
            progress,
        }
    }

    /// Replace the burst executor
    pub fn with_burst(mut self, burst: Arc<dyn BurstExecutor>) -> Self {
        self.burst = burst;
        self
    }

    /// Replace both pacing strategies
    pub fn with_pacers(mut self, producer: Arc<dyn Pacer>, consumer: Arc<dyn Pacer>) -> Self {
        self.producer_pacer = producer;
        self.consumer_pacer = consumer;
        self
    }

    /// Run both phases in order
    ///
    /// # Errors
    /// - AppError::Channel if the configured capacity is zero
    /// - AppError::Join if a role task panicked
    pub async fn run(
        &self,
        descriptors: &[WorkloadDescriptor],
        cancel: &CancelToken,
    ) -> Result<SimulationReport> {
        self.config.validate()?;

        let workloads = self.run_workloads(descriptors, cancel).await;
        let (producer, consumer, channel) = self.run_producer_consumer(cancel).await?;

        Ok(SimulationReport {
            workloads,
            producer,
            consumer,
            channel,
        })
    }

    /// Phase 1: every workload concurrently, joined
    pub async fn run_workloads(
        &self,
        descriptors: &[WorkloadDescriptor],
        cancel: &CancelToken,
    ) -> RunReport {
        self.progress.emit(ProgressEvent::PhaseStarted {
            phase: Phase::Workloads,
        });
        let runner = WorkloadRunner::new(Arc::clone(&self.burst), Arc::clone(&self.progress));
        let report = runner.run_all(descriptors, cancel).await;
        self.progress.emit(ProgressEvent::PhaseFinished {
            phase: Phase::Workloads,
        });
        report
    }

    /// Phase 2: one producer and one consumer over a fresh channel
    pub async fn run_producer_consumer(
        &self,
        cancel: &CancelToken,
    ) -> Result<(RoleReport, RoleReport, ChannelStats)> {
        self.progress.emit(ProgressEvent::PhaseStarted {
            phase: Phase::ProducerConsumer,
        });
        info!(
            capacity = self.config.capacity,
            items = self.config.items,
            "Starting producer and consumer"
        );

        let channel = Arc::new(BoundedChannel::new(self.config.capacity)?);
        let items = self.config.items;

        let producer = Producer::new(
            PRODUCER_NAME,
            Arc::clone(&channel),
            Arc::clone(&self.producer_pacer),
            Arc::clone(&self.progress),
        );
        let consumer = Consumer::new(
            CONSUMER_NAME,
            Arc::clone(&channel),
            Arc::clone(&self.consumer_pacer),
            Arc::clone(&self.progress),
        );

        let producer_cancel = cancel.clone();
        let producer_handle =
            tokio::spawn(async move { producer.run(items, &producer_cancel).await });
        let consumer_cancel = cancel.clone();
        let consumer_handle =
            tokio::spawn(async move { consumer.run(items, &consumer_cancel).await });

        let (producer_report, consumer_report) = tokio::join!(producer_handle, consumer_handle);
        let producer_report = producer_report?;
        let consumer_report = consumer_report?;

        let stats = channel.stats();
        info!(
            sent = stats.sent,
            received = stats.received,
            high_water = stats.high_water,
            "Producer and consumer joined"
        );
        self.progress.emit(ProgressEvent::PhaseFinished {
            phase: Phase::ProducerConsumer,
        });
        Ok((producer_report, consumer_report, stats))
    }
}
