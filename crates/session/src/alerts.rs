//! Alert delivery.
//!
//! Alerts are fire-and-forget: a sink that cannot deliver drops the alert
//! and the session carries on.

use medfocus_scoring::alerts::{AlertEvent, AlertLevel};
use tokio::sync::mpsc::UnboundedSender;

/// Receives alerts raised by a running session.
pub trait AlertSink: Send {
    fn notify(&mut self, event: &AlertEvent);
}

/// Writes alerts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn notify(&mut self, event: &AlertEvent) {
        match event.level {
            AlertLevel::Critical => tracing::warn!(
                score = event.score,
                timestamp_ms = event.timestamp_ms,
                "{}",
                event.level.message()
            ),
            AlertLevel::Ordinary => tracing::info!(
                score = event.score,
                timestamp_ms = event.timestamp_ms,
                "{}",
                event.level.message()
            ),
        }
    }
}

/// Forwards alerts to a channel, e.g. a notification task.
#[derive(Debug, Clone)]
pub struct ChannelAlertSink {
    tx: UnboundedSender<AlertEvent>,
}

impl ChannelAlertSink {
    pub fn new(tx: UnboundedSender<AlertEvent>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ChannelAlertSink {
    fn notify(&mut self, event: &AlertEvent) {
        if self.tx.send(*event).is_err() {
            tracing::debug!(level = ?event.level, "Alert receiver gone, dropping alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(level: AlertLevel) -> AlertEvent {
        AlertEvent {
            level,
            score: 42.0,
            timestamp_ms: 1000.0,
        }
    }

    #[test]
    fn channel_sink_forwards_alerts() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = ChannelAlertSink::new(tx);
        sink.notify(&event(AlertLevel::Ordinary));
        sink.notify(&event(AlertLevel::Critical));

        assert_eq!(rx.try_recv().unwrap().level, AlertLevel::Ordinary);
        assert_eq!(rx.try_recv().unwrap().level, AlertLevel::Critical);
    }

    #[test]
    fn channel_sink_survives_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let mut sink = ChannelAlertSink::new(tx);
        sink.notify(&event(AlertLevel::Critical));
    }
}
