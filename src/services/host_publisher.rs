//! Host Publisher
//!
//! Background thread that republishes the driver station's IP address and
//! connectivity once per interval.
//!
//! ```text
//! loop until stopped:
//!     resolve hostname ──► resolve IP ──► set driverStationIP
//!                                     └─► set driverStationConnected
//!     sleep(interval)
//! ```
//!
//! A failed lookup is logged and published as placeholders; the loop keeps
//! its cadence. The log panel hears about a failure once per outage.

use std::net::{IpAddr, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::domain::field::{DRIVER_STATION_CONNECTED, DRIVER_STATION_IP};
use crate::error::{Error, Result};
use crate::eventing::app_event::AppEvent;
use crate::telemetry::{TelemetryClient, TopicLayout, Value};

/// Local machine identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub hostname: String,
    pub ip: IpAddr,
}

/// Looks up the local hostname and address
pub trait HostResolver: Send + 'static {
    fn resolve(&self) -> Result<HostIdentity>;
}

/// Resolver backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self) -> Result<HostIdentity> {
        let hostname = hostname::get()?
            .into_string()
            .map_err(|_| Error::Resolve {
                message: "hostname is not valid UTF-8".to_string(),
            })?;

        let addresses: Vec<IpAddr> = (hostname.as_str(), 0)
            .to_socket_addrs()?
            .map(|addr| addr.ip())
            .collect();
        let ip = addresses
            .iter()
            .copied()
            .find(IpAddr::is_ipv4)
            .or_else(|| addresses.first().copied())
            .ok_or_else(|| Error::Resolve {
                message: format!("no address for {hostname}"),
            })?;

        Ok(HostIdentity { hostname, ip })
    }
}

/// What one iteration published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub ip: Option<IpAddr>,
    pub connected: bool,
}

/// Publishes the host identity through the telemetry client
pub struct HostPublisher {
    client: Arc<dyn TelemetryClient>,
    layout: TopicLayout,
    events: flume::Sender<AppEvent>,
    /// Whether the previous lookup failed
    failing: AtomicBool,
}

impl HostPublisher {
    pub fn new(
        client: Arc<dyn TelemetryClient>,
        layout: TopicLayout,
        events: flume::Sender<AppEvent>,
    ) -> Self {
        Self {
            client,
            layout,
            events,
            failing: AtomicBool::new(false),
        }
    }

    /// Resolve and publish once
    pub fn publish_once(&self, resolver: &dyn HostResolver) -> HostReport {
        let ip = match resolver.resolve() {
            Ok(identity) => {
                tracing::trace!("Resolved {} to {}", identity.hostname, identity.ip);
                if self.failing.swap(false, Ordering::SeqCst) {
                    let _ = self.events.send(AppEvent::info(format!(
                        "Driver station IP resolved: {}",
                        identity.ip
                    )));
                }
                Some(identity.ip)
            }
            Err(e) => {
                tracing::warn!("Could not resolve driver station IP: {}", e);
                if !self.failing.swap(true, Ordering::SeqCst) {
                    let _ = self
                        .events
                        .send(AppEvent::warn("Could not resolve driver station IP"));
                }
                None
            }
        };

        let connected = ip.is_some() && self.client.is_connected();
        let ip_text = ip.map(|ip| ip.to_string()).unwrap_or_default();

        if let Err(e) = self
            .client
            .set(&self.layout.topic(DRIVER_STATION_IP), Value::String(ip_text))
        {
            tracing::warn!("Failed to publish driver station IP: {}", e);
        }
        if let Err(e) = self.client.set(
            &self.layout.topic(DRIVER_STATION_CONNECTED),
            Value::String(connected.to_string()),
        ) {
            tracing::warn!("Failed to publish driver station connectivity: {}", e);
        }

        HostReport { ip, connected }
    }

    /// Start the polling thread
    pub fn spawn(
        self,
        resolver: impl HostResolver,
        interval: Duration,
    ) -> Result<HostPublisherHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let thread = std::thread::Builder::new()
            .name("host-publisher".to_string())
            .spawn(move || {
                tracing::info!("Host publisher started ({:?} interval)", interval);
                while !stop_flag.load(Ordering::SeqCst) {
                    self.publish_once(&resolver);
                    std::thread::sleep(interval);
                }
                tracing::info!("Host publisher stopped");
            })?;

        Ok(HostPublisherHandle {
            stop,
            thread: Some(thread),
        })
    }
}

/// Handle to the polling thread
#[derive(Debug)]
pub struct HostPublisherHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl HostPublisherHandle {
    /// Ask the loop to stop; it observes the flag after its current sleep
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Stop and wait for the thread to exit
    pub fn join(mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Host publisher thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::memory::MemoryTelemetry;
    use std::net::Ipv4Addr;
    use std::sync::atomic::AtomicUsize;

    struct FixedResolver;

    impl HostResolver for FixedResolver {
        fn resolve(&self) -> Result<HostIdentity> {
            Ok(HostIdentity {
                hostname: "driverstation".to_string(),
                ip: IpAddr::V4(Ipv4Addr::new(10, 4, 88, 5)),
            })
        }
    }

    #[derive(Clone, Default)]
    struct FailingResolver {
        calls: Arc<AtomicUsize>,
    }

    impl HostResolver for FailingResolver {
        fn resolve(&self) -> Result<HostIdentity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Resolve {
                message: "no network".to_string(),
            })
        }
    }

    fn publisher() -> (HostPublisher, Arc<MemoryTelemetry>, flume::Receiver<AppEvent>) {
        let (tx, rx) = flume::unbounded();
        let client = Arc::new(MemoryTelemetry::new(tx.clone()));
        let publisher = HostPublisher::new(client.clone(), TopicLayout::default(), tx);
        (publisher, client, rx)
    }

    #[test]
    fn test_publishes_ip_and_connectivity() {
        let (publisher, client, _rx) = publisher();
        let layout = TopicLayout::default();

        let report = publisher.publish_once(&FixedResolver);

        assert_eq!(report.ip, Some(IpAddr::V4(Ipv4Addr::new(10, 4, 88, 5))));
        assert_eq!(
            client.get(&layout.topic(DRIVER_STATION_IP)),
            Some(Value::from("10.4.88.5"))
        );
        assert_eq!(
            client.get(&layout.topic(DRIVER_STATION_CONNECTED)),
            Some(Value::from("true"))
        );
    }

    #[test]
    fn test_connectivity_follows_client() {
        let (publisher, client, _rx) = publisher();
        client.set_connected(false);

        let report = publisher.publish_once(&FixedResolver);

        assert!(!report.connected);
        assert_eq!(
            client.get(&TopicLayout::default().topic(DRIVER_STATION_CONNECTED)),
            Some(Value::from("false"))
        );
    }

    #[test]
    fn test_failure_publishes_placeholders_and_logs() {
        let (publisher, client, rx) = publisher();
        let layout = TopicLayout::default();

        let report = publisher.publish_once(&FailingResolver::default());

        assert_eq!(report, HostReport { ip: None, connected: false });
        assert_eq!(client.get(&layout.topic(DRIVER_STATION_IP)), Some(Value::from("")));
        assert_eq!(
            client.get(&layout.topic(DRIVER_STATION_CONNECTED)),
            Some(Value::from("false"))
        );
        assert!(rx.try_iter().any(|event| matches!(
            event,
            AppEvent::Log { ref message, .. } if message == "Could not resolve driver station IP"
        )));
    }

    #[test]
    fn test_repeated_failures_warn_once_per_outage() {
        let (publisher, _client, rx) = publisher();
        let failing = FailingResolver::default();

        publisher.publish_once(&failing);
        publisher.publish_once(&failing);
        publisher.publish_once(&failing);
        publisher.publish_once(&FixedResolver);
        publisher.publish_once(&failing);

        let messages: Vec<String> = rx
            .try_iter()
            .filter_map(|event| match event {
                AppEvent::Log { message, .. } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(
            messages,
            vec![
                "Could not resolve driver station IP".to_string(),
                "Driver station IP resolved: 10.4.88.5".to_string(),
                "Could not resolve driver station IP".to_string(),
            ]
        );
    }

    #[test]
    fn test_loop_survives_failures_and_stops() {
        let (publisher, client, _rx) = publisher();
        let resolver = FailingResolver::default();
        let calls = resolver.calls.clone();

        let handle = publisher
            .spawn(resolver, Duration::from_millis(5))
            .expect("spawn");
        std::thread::sleep(Duration::from_millis(100));
        handle.join();

        let after_stop = calls.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "expected repeated attempts, got {after_stop}");
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
        assert_eq!(
            client.get(&TopicLayout::default().topic(DRIVER_STATION_IP)),
            Some(Value::from(""))
        );
    }

    #[test]
    fn test_system_resolver_reports_lookup_errors() {
        // environments without DNS for the local hostname return an error
        match SystemResolver.resolve() {
            Ok(identity) => assert!(!identity.hostname.is_empty()),
            Err(e) => assert!(
                matches!(e, Error::Resolve { .. } | Error::Io { .. }),
                "unexpected error: {e}"
            ),
        }
    }
}
