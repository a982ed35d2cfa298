//! Router actor and its handle

use helios_ports::mailbox::{self, Ack, Put, Reply};
use helios_ports::{DEFAULT_MAILBOX_CAPACITY, MailboxClosed};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::DispatchError;

/// Registry mutations and queries
enum Control<M> {
    Subscribe {
        topic: String,
        name: String,
        endpoint: mpsc::Sender<M>,
        ack: Option<Ack>,
    },
    Unsubscribe {
        topic: String,
        name: String,
        ack: Option<Ack>,
    },
    Subscribers {
        topic: String,
        reply: Reply<Vec<String>>,
    },
    Shutdown {
        ack: Ack,
    },
}

/// A message to broadcast under a topic
struct Outgoing<M> {
    topic: String,
    message: M,
    /// Receives the number of endpoints the message was handed to
    delivered: Reply<usize>,
}

/// Handle to a running fan-out router
///
/// Cheap to clone; the router stops once every handle is dropped or
/// [`Dispatcher::shutdown`] is called.
pub struct Dispatcher<M> {
    control: mpsc::Sender<Control<M>>,
    outbox: mpsc::Sender<Outgoing<M>>,
}

impl<M> Clone for Dispatcher<M> {
    fn clone(&self) -> Self {
        Self {
            control: self.control.clone(),
            outbox: self.outbox.clone(),
        }
    }
}

impl<M> Dispatcher<M>
where
    M: Clone + Send + 'static,
{
    /// Spawn a router with the default mailbox capacity
    pub fn spawn() -> (Self, JoinHandle<()>) {
        Self::with_capacity(DEFAULT_MAILBOX_CAPACITY)
    }

    /// Spawn a router whose mailboxes hold `capacity` requests each
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> (Self, JoinHandle<()>) {
        let capacity = capacity.max(1);
        let (control_tx, control_rx) = mpsc::channel(capacity);
        let (outbox_tx, outbox_rx) = mpsc::channel(capacity);

        let router = Router {
            registry: HashMap::new(),
            control_rx,
            outbox_rx,
            shutdown_acks: Vec::new(),
        };
        let handle = tokio::spawn(router.run());

        (
            Self {
                control: control_tx,
                outbox: outbox_tx,
            },
            handle,
        )
    }

    /// Register `endpoint` under `topic` as `name`
    ///
    /// Re-subscribing an existing (topic, name) pair replaces the previous
    /// endpoint. With `wait`, returns once the registration is applied.
    pub async fn subscribe(
        &self,
        topic: &str,
        name: &str,
        endpoint: mpsc::Sender<M>,
        wait: bool,
    ) -> Result<(), DispatchError> {
        let (put, done) = Put::new((), wait);
        let ((), ack) = put.into_parts();
        self.control
            .send(Control::Subscribe {
                topic: topic.to_string(),
                name: name.to_string(),
                endpoint,
                ack,
            })
            .await
            .map_err(|_| MailboxClosed)?;
        mailbox::wait_for(done).await?;
        Ok(())
    }

    /// Remove `name` from `topic`; unknown names are ignored
    pub async fn unsubscribe(&self, topic: &str, name: &str, wait: bool) -> Result<(), DispatchError> {
        let (put, done) = Put::new((), wait);
        let ((), ack) = put.into_parts();
        self.control
            .send(Control::Unsubscribe {
                topic: topic.to_string(),
                name: name.to_string(),
                ack,
            })
            .await
            .map_err(|_| MailboxClosed)?;
        mailbox::wait_for(done).await?;
        Ok(())
    }

    /// Deliver `message` to every endpoint subscribed to `topic`
    ///
    /// Returns once the message sits in every endpoint queue, with the
    /// number of endpoints reached.
    pub async fn send(&self, message: M, topic: &str) -> Result<usize, DispatchError> {
        let delivered = mailbox::request(&self.outbox, |reply| Outgoing {
            topic: topic.to_string(),
            message,
            delivered: reply,
        })
        .await?;
        Ok(delivered)
    }

    /// Names currently subscribed to `topic`, sorted
    pub async fn subscribers(&self, topic: &str) -> Result<Vec<String>, DispatchError> {
        let names = mailbox::request(&self.control, |reply| Control::Subscribers {
            topic: topic.to_string(),
            reply,
        })
        .await?;
        Ok(names)
    }

    /// Stop the router once it has delivered what it already accepted
    pub async fn shutdown(&self) -> Result<(), DispatchError> {
        mailbox::request(&self.control, |ack| Control::Shutdown { ack }).await?;
        Ok(())
    }
}

/// The worker owning the subscription registry
struct Router<M> {
    /// topic -> endpoint name -> queue
    registry: HashMap<String, BTreeMap<String, mpsc::Sender<M>>>,
    control_rx: mpsc::Receiver<Control<M>>,
    outbox_rx: mpsc::Receiver<Outgoing<M>>,
    shutdown_acks: Vec<Ack>,
}

impl<M> Router<M>
where
    M: Clone + Send + 'static,
{
    async fn run(mut self) {
        log::info!("[Dispatcher] Router started");

        loop {
            tokio::select! {
                Some(control) = self.control_rx.recv() => self.handle_control(control),
                Some(outgoing) = self.outbox_rx.recv() => self.deliver(outgoing).await,
                else => break,
            }
        }

        for ack in self.shutdown_acks.drain(..) {
            let _ = ack.send(());
        }
        log::info!("[Dispatcher] Router stopped");
    }

    fn handle_control(&mut self, control: Control<M>) {
        match control {
            Control::Subscribe {
                topic,
                name,
                endpoint,
                ack,
            } => {
                let endpoints = self.registry.entry(topic.clone()).or_default();
                if endpoints.insert(name.clone(), endpoint).is_some() {
                    log::debug!("[Dispatcher] {} re-subscribed to {}", name, topic);
                } else {
                    log::debug!("[Dispatcher] {} subscribed to {}", name, topic);
                }
                mailbox::acknowledge(ack);
            }
            Control::Unsubscribe { topic, name, ack } => {
                if let Some(endpoints) = self.registry.get_mut(&topic) {
                    if endpoints.remove(&name).is_some() {
                        log::debug!("[Dispatcher] {} unsubscribed from {}", name, topic);
                    }
                    if endpoints.is_empty() {
                        self.registry.remove(&topic);
                    }
                }
                mailbox::acknowledge(ack);
            }
            Control::Subscribers { topic, reply } => {
                let names = self
                    .registry
                    .get(&topic)
                    .map(|endpoints| endpoints.keys().cloned().collect())
                    .unwrap_or_default();
                let _ = reply.send(names);
            }
            Control::Shutdown { ack } => {
                log::info!("[Dispatcher] Shutdown requested");
                self.shutdown_acks.push(ack);
                // Stop accepting; already-queued requests are still served
                self.control_rx.close();
                self.outbox_rx.close();
            }
        }
    }

    async fn deliver(&mut self, outgoing: Outgoing<M>) {
        let Outgoing {
            topic,
            message,
            delivered,
        } = outgoing;

        let mut count = 0;
        let mut gone = Vec::new();
        if let Some(endpoints) = self.registry.get(&topic) {
            for (name, endpoint) in endpoints {
                match endpoint.send(message.clone()).await {
                    Ok(()) => count += 1,
                    Err(_) => gone.push(name.clone()),
                }
            }
        }

        if !gone.is_empty() {
            if let Some(endpoints) = self.registry.get_mut(&topic) {
                for name in &gone {
                    log::warn!("[Dispatcher] Endpoint {} on {} closed, removing", name, topic);
                    endpoints.remove(name);
                }
                if endpoints.is_empty() {
                    self.registry.remove(&topic);
                }
            }
        }

        log::trace!("[Dispatcher] {} delivered to {} endpoints", topic, count);
        let _ = delivered.send(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_subscribers() {
        let (dispatcher, _handle) = Dispatcher::<u32>::spawn();
        assert_eq!(dispatcher.send(1, "nobody").await, Ok(0));
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let (dispatcher, _handle) = Dispatcher::<u32>::with_capacity(0);
        let (tx, mut rx) = mpsc::channel(1);
        dispatcher.subscribe("t", "a", tx, true).await.unwrap();

        assert_eq!(dispatcher.send(3, "t").await, Ok(1));
        assert_eq!(rx.recv().await, Some(3));
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent_by_name() {
        let (dispatcher, _handle) = Dispatcher::<u32>::spawn();
        let (old_tx, mut old_rx) = mpsc::channel(4);
        let (new_tx, mut new_rx) = mpsc::channel(4);

        dispatcher.subscribe("t", "a", old_tx, true).await.unwrap();
        dispatcher.subscribe("t", "a", new_tx, true).await.unwrap();

        assert_eq!(dispatcher.subscribers("t").await.unwrap(), vec!["a"]);
        assert_eq!(dispatcher.send(7, "t").await, Ok(1));
        assert_eq!(new_rx.recv().await, Some(7));
        assert!(old_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let (dispatcher, _handle) = Dispatcher::<&'static str>::spawn();
        let (tx, mut rx) = mpsc::channel(4);
        dispatcher.subscribe("delta", "a", tx, true).await.unwrap();

        assert_eq!(dispatcher.send("proposal", "proposal").await, Ok(0));
        assert_eq!(dispatcher.send("delta", "delta").await, Ok(1));
        assert_eq!(rx.recv().await, Some("delta"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let (dispatcher, _handle) = Dispatcher::<u32>::spawn();
        let (tx, mut rx) = mpsc::channel(4);
        dispatcher.subscribe("t", "a", tx, true).await.unwrap();
        dispatcher.unsubscribe("t", "a", true).await.unwrap();

        assert!(dispatcher.subscribers("t").await.unwrap().is_empty());
        assert_eq!(dispatcher.send(1, "t").await, Ok(0));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_endpoint_is_pruned() {
        let (dispatcher, _handle) = Dispatcher::<u32>::spawn();
        let (live_tx, mut live_rx) = mpsc::channel(4);
        let (dead_tx, dead_rx) = mpsc::channel(4);
        dispatcher.subscribe("t", "live", live_tx, true).await.unwrap();
        dispatcher.subscribe("t", "dead", dead_tx, true).await.unwrap();
        drop(dead_rx);

        assert_eq!(dispatcher.send(3, "t").await, Ok(1));
        assert_eq!(live_rx.recv().await, Some(3));
        assert_eq!(dispatcher.subscribers("t").await.unwrap(), vec!["live"]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_router() {
        let (dispatcher, handle) = Dispatcher::<u32>::spawn();
        dispatcher.shutdown().await.unwrap();
        handle.await.unwrap();

        assert_eq!(
            dispatcher.send(1, "t").await,
            Err(DispatchError::Closed(MailboxClosed))
        );
    }
}
