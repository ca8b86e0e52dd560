//! Typed resource watcher with create/update/delete callbacks
//!
//! Wraps `kube::runtime::watcher` and turns its event stream into
//! create/update/delete callbacks with a bounded requeue policy.
//!
//! ## How It Works
//!
//! 1. Every watched kind is resolved through a [`RestMapper`] at construction
//! 2. `start()` spawns one task per kind and waits for each initial list
//! 3. Each task keeps a cache of the last seen object per key:
//!    - `Apply` of an unknown key → create
//!    - `Apply` of a known key → update, unless the objects are equivalent
//!    - `Delete` → delete
//!    - Relist (`Init` … `InitDone`) → delete for objects that vanished
//! 4. A callback returning `true` is requeued with exponential backoff,
//!    then dropped once `max_requeues` is exhausted. Pending retries live in
//!    the loop's own delay queue and are discarded when it stops

use crate::apis::metrics::{record_watch_drop, record_watch_requeue};
use crate::apis::rest_mapper::{gvk_of, RestMapper};
use crate::config::RetryPolicy;
use crate::error::WatcherError;
use async_trait::async_trait;
use futures::StreamExt;
use kube::api::Api;
use kube::core::GroupVersionKind;
use kube::runtime::reflector::ObjectRef;
use kube::runtime::watcher;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::WatchStreamExt;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::time::DelayQueue;
use tracing::{debug, info, warn};

/// Predicate deciding whether an update carries no meaningful change
pub type ResourcesEquivalent<K> = Arc<dyn Fn(&K, &K) -> bool + Send + Sync>;

/// Callbacks invoked for a watched resource kind
///
/// Each callback returns `true` to request a requeue of the event.
#[async_trait]
pub trait ResourceEventHandler<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    async fn on_create(&self, obj: Arc<K>, num_requeues: u32) -> bool;

    async fn on_update(&self, obj: Arc<K>, num_requeues: u32) -> bool;

    async fn on_delete(&self, obj: Arc<K>, num_requeues: u32) -> bool;
}

/// Callback kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Watch configuration for one resource kind
pub struct ResourceConfig<K>
where
    K: Resource + Send + Sync + 'static,
{
    /// Watcher name (for logging and metric labels)
    pub name: String,
    /// Api handle scoped to the source namespace (or cluster-wide)
    pub api: Api<K>,
    pub handler: Arc<dyn ResourceEventHandler<K>>,
    /// Custom update filter; defaults to comparing `resourceVersion`
    pub resources_equivalent: Option<ResourcesEquivalent<K>>,
    pub retry: RetryPolicy,
}

/// Default equivalence: same non-empty `resourceVersion`
pub fn same_resource_version<K: Resource>(old: &K, new: &K) -> bool {
    match (old.resource_version(), new.resource_version()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Type-erased watch configuration, so kinds can be mixed in one watcher
pub trait WatchedResource: Send {
    fn name(&self) -> &str;

    fn gvk(&self) -> GroupVersionKind;

    fn spawn(
        self: Box<Self>,
        token: CancellationToken,
        synced: oneshot::Sender<()>,
    ) -> JoinHandle<()>;
}

impl<K> WatchedResource for ResourceConfig<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn gvk(&self) -> GroupVersionKind {
        gvk_of::<K>()
    }

    fn spawn(
        self: Box<Self>,
        token: CancellationToken,
        synced: oneshot::Sender<()>,
    ) -> JoinHandle<()> {
        let ResourceConfig {
            name,
            api,
            handler,
            resources_equivalent,
            retry,
        } = *self;
        let watch_loop = WatchLoop::new(name, handler, resources_equivalent, retry);
        tokio::spawn(watch_loop.run(api, token, synced))
    }
}

impl<K> ResourceConfig<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    pub fn boxed(self) -> Box<dyn WatchedResource> {
        Box::new(self)
    }
}

/// Watches a set of resource kinds
pub struct ResourceWatcher {
    names: Vec<String>,
    resources: Mutex<Option<Vec<Box<dyn WatchedResource>>>>,
}

impl ResourceWatcher {
    /// Create a watcher, failing if any kind cannot be mapped
    pub async fn new(
        rest_mapper: &dyn RestMapper,
        resources: Vec<Box<dyn WatchedResource>>,
    ) -> Result<Self, WatcherError> {
        for resource in &resources {
            let gvk = resource.gvk();
            rest_mapper
                .resolve(&gvk)
                .await
                .map_err(|source| WatcherError::Mapping {
                    kind: gvk.kind.clone(),
                    api_version: api_version(&gvk),
                    source,
                })?;
        }

        Ok(Self {
            names: resources.iter().map(|r| r.name().to_string()).collect(),
            resources: Mutex::new(Some(resources)),
        })
    }

    /// Names of the watched resources
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Start all watches and wait for their initial sync
    ///
    /// Fails if already started, or if a watch stops (e.g. `token` is
    /// cancelled) before its initial list completed.
    pub async fn start(&self, token: CancellationToken) -> Result<(), WatcherError> {
        let resources = self
            .resources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or(WatcherError::AlreadyStarted)?;

        let mut pending = Vec::with_capacity(resources.len());
        for resource in resources {
            let name = resource.name().to_string();
            let (synced_tx, synced_rx) = oneshot::channel();
            resource.spawn(token.clone(), synced_tx);
            pending.push((name, synced_rx));
        }

        for (name, synced_rx) in pending {
            synced_rx
                .await
                .map_err(|_| WatcherError::SyncFailed(name.clone()))?;
            debug!("{} caches synced", name);
        }

        Ok(())
    }
}

fn api_version(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        gvk.version.clone()
    } else {
        format!("{}/{}", gvk.group, gvk.version)
    }
}

struct Retry<K: Resource> {
    op: Operation,
    key: ObjectRef<K>,
    obj: Arc<K>,
    num_requeues: u32,
}

/// Per-kind event loop state
pub(crate) struct WatchLoop<K>
where
    K: Resource<DynamicType = ()> + Send + Sync + 'static,
{
    name: String,
    handler: Arc<dyn ResourceEventHandler<K>>,
    resources_equivalent: Option<ResourcesEquivalent<K>>,
    retry: RetryPolicy,
    cache: HashMap<ObjectRef<K>, Arc<K>>,
    relist: Option<HashSet<ObjectRef<K>>>,
    synced: bool,
    retries: DelayQueue<Retry<K>>,
}

impl<K> WatchLoop<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    pub(crate) fn new(
        name: String,
        handler: Arc<dyn ResourceEventHandler<K>>,
        resources_equivalent: Option<ResourcesEquivalent<K>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            name,
            handler,
            resources_equivalent,
            retry,
            cache: HashMap::new(),
            relist: None,
            synced: false,
            retries: DelayQueue::new(),
        }
    }

    async fn run(
        mut self,
        api: Api<K>,
        token: CancellationToken,
        synced: oneshot::Sender<()>,
    ) {
        let stream = watcher(api, WatcherConfig::default()).default_backoff();
        futures::pin_mut!(stream);

        let mut synced = Some(synced);

        info!("Starting {}", self.name);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("{} stopping", self.name);
                    break;
                }
                // An empty DelayQueue yields None right away
                Some(expired) = self.retries.next(), if !self.retries.is_empty() => {
                    self.handle_retry(expired.into_inner()).await;
                }
                event = stream.next() => match event {
                    Some(Ok(event)) => {
                        self.handle_event(event).await;
                        if self.synced {
                            if let Some(tx) = synced.take() {
                                info!("{} initial sync complete", self.name);
                                let _ = tx.send(());
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!("{} error: {}", self.name, e);
                    }
                    None => {
                        warn!("{} stream ended", self.name);
                        break;
                    }
                }
            }
        }
    }

    /// Translate one watch event into callbacks
    pub(crate) async fn handle_event(&mut self, event: watcher::Event<K>) {
        match event {
            watcher::Event::Init => {
                debug!("{} relist started", self.name);
                self.relist = Some(HashSet::new());
            }
            watcher::Event::InitApply(obj) => {
                if let Some(seen) = self.relist.as_mut() {
                    seen.insert(ObjectRef::from_obj(&obj));
                }
                self.apply(obj).await;
            }
            watcher::Event::InitDone => {
                if let Some(seen) = self.relist.take() {
                    let vanished: Vec<_> = self
                        .cache
                        .keys()
                        .filter(|key| !seen.contains(*key))
                        .cloned()
                        .collect();
                    for key in vanished {
                        if let Some(obj) = self.cache.remove(&key) {
                            debug!("{}: {} vanished during relist", self.name, key);
                            self.dispatch(Operation::Delete, key, obj, 0).await;
                        }
                    }
                }
                self.synced = true;
            }
            watcher::Event::Apply(obj) => self.apply(obj).await,
            watcher::Event::Delete(obj) => {
                let key = ObjectRef::from_obj(&obj);
                self.cache.remove(&key);
                self.dispatch(Operation::Delete, key, Arc::new(obj), 0)
                    .await;
            }
        }
    }

    async fn apply(&mut self, obj: K) {
        let key = ObjectRef::from_obj(&obj);
        let obj = Arc::new(obj);

        match self.cache.insert(key.clone(), Arc::clone(&obj)) {
            None => self.dispatch(Operation::Create, key, obj, 0).await,
            Some(old) if self.is_equivalent(&old, &obj) => {
                debug!("{}: {} unchanged, skipping update", self.name, key);
            }
            Some(_) => self.dispatch(Operation::Update, key, obj, 0).await,
        }
    }

    fn is_equivalent(&self, old: &K, new: &K) -> bool {
        match &self.resources_equivalent {
            Some(equivalent) => equivalent(old, new),
            None => same_resource_version(old, new),
        }
    }

    async fn dispatch(&mut self, op: Operation, key: ObjectRef<K>, obj: Arc<K>, num_requeues: u32) {
        let requeue = match op {
            Operation::Create => self.handler.on_create(Arc::clone(&obj), num_requeues).await,
            Operation::Update => self.handler.on_update(Arc::clone(&obj), num_requeues).await,
            Operation::Delete => self.handler.on_delete(Arc::clone(&obj), num_requeues).await,
        };

        if !requeue {
            return;
        }

        if !self.retry.allows_requeue(num_requeues) {
            debug!(
                "{}: dropping {:?} of {} after {} requeues",
                self.name, op, key, num_requeues
            );
            record_watch_drop(&self.name);
            return;
        }

        record_watch_requeue(&self.name);
        let delay = self.retry.backoff(num_requeues);
        self.retries.insert(
            Retry {
                op,
                key,
                obj,
                num_requeues: num_requeues + 1,
            },
            delay,
        );
    }

    async fn handle_retry(&mut self, retry: Retry<K>) {
        let Retry {
            op,
            key,
            obj,
            num_requeues,
        } = retry;

        match op {
            Operation::Delete if self.cache.contains_key(&key) => {
                debug!("{}: {} was recreated, dropping delete retry", self.name, key);
            }
            Operation::Delete => self.dispatch(op, key, obj, num_requeues).await,
            Operation::Create | Operation::Update => match self.cache.get(&key).cloned() {
                // Retry with the latest known version of the object
                Some(latest) => self.dispatch(op, key, latest, num_requeues).await,
                None => debug!("{}: {} no longer exists, dropping retry", self.name, key),
            },
        }
    }

    #[cfg(test)]
    async fn next_retry(&mut self) -> Option<Retry<K>> {
        if self.retries.is_empty() {
            return None;
        }
        self.retries.next().await.map(|expired| expired.into_inner())
    }

    #[cfg(test)]
    fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    #[cfg(test)]
    fn is_synced(&self) -> bool {
        self.synced
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::apis::rest_mapper::StaticRestMapper;
    use common::Endpoint;
    use k8s_openapi::api::core::v1::Node;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Weak;
    use std::time::Duration;

    /// Records callbacks; fails the first `failures` calls
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(Operation, String, u32)>>,
        failures: AtomicU32,
        last_seen: Mutex<Option<Weak<Node>>>,
    }

    impl Recorder {
        fn failing(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                ..Default::default()
            }
        }

        fn record(&self, op: Operation, node: &Arc<Node>, num_requeues: u32) -> bool {
            *self.last_seen.lock().unwrap() = Some(Arc::downgrade(node));
            self.calls
                .lock()
                .unwrap()
                .push((op, node.name_any(), num_requeues));
            self.failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }

        fn calls(&self) -> Vec<(Operation, String, u32)> {
            self.calls.lock().unwrap().clone()
        }

        fn last_seen(&self) -> Weak<Node> {
            self.last_seen.lock().unwrap().clone().expect("A callback ran")
        }
    }

    #[async_trait]
    impl ResourceEventHandler<Node> for Recorder {
        async fn on_create(&self, obj: Arc<Node>, num_requeues: u32) -> bool {
            self.record(Operation::Create, &obj, num_requeues)
        }

        async fn on_update(&self, obj: Arc<Node>, num_requeues: u32) -> bool {
            self.record(Operation::Update, &obj, num_requeues)
        }

        async fn on_delete(&self, obj: Arc<Node>, num_requeues: u32) -> bool {
            self.record(Operation::Delete, &obj, num_requeues)
        }
    }

    fn node(name: &str, resource_version: &str) -> Node {
        Node {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                resource_version: Some(resource_version.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn fast_retry(max_requeues: u32) -> RetryPolicy {
        RetryPolicy {
            max_requeues,
            base_delay_ms: 0,
            max_delay_secs: 0,
        }
    }

    fn watch_loop(recorder: Arc<Recorder>, retry: RetryPolicy) -> WatchLoop<Node> {
        WatchLoop::new("Node watcher".to_string(), recorder, None, retry)
    }

    #[tokio::test]
    async fn test_apply_and_delete_map_to_callbacks() {
        let recorder = Arc::new(Recorder::default());
        let mut wl = watch_loop(recorder.clone(), RetryPolicy::default());

        wl.handle_event(watcher::Event::Apply(node("worker-1", "1"))).await;
        wl.handle_event(watcher::Event::Apply(node("worker-1", "2"))).await;
        // Same resourceVersion: no update delivered
        wl.handle_event(watcher::Event::Apply(node("worker-1", "2"))).await;
        wl.handle_event(watcher::Event::Delete(node("worker-1", "3"))).await;

        assert_eq!(
            recorder.calls(),
            vec![
                (Operation::Create, "worker-1".to_string(), 0),
                (Operation::Update, "worker-1".to_string(), 0),
                (Operation::Delete, "worker-1".to_string(), 0),
            ]
        );
        assert_eq!(wl.cached(), 0);
    }

    #[tokio::test]
    async fn test_relist_deletes_vanished_objects() {
        let recorder = Arc::new(Recorder::default());
        let mut wl = watch_loop(recorder.clone(), RetryPolicy::default());

        wl.handle_event(watcher::Event::Apply(node("worker-1", "1"))).await;
        wl.handle_event(watcher::Event::Apply(node("worker-2", "1"))).await;
        assert!(!wl.is_synced());

        // Watch restarted: only worker-1 is still listed
        wl.handle_event(watcher::Event::Init).await;
        wl.handle_event(watcher::Event::InitApply(node("worker-1", "1"))).await;
        wl.handle_event(watcher::Event::InitDone).await;

        assert!(wl.is_synced());
        assert_eq!(wl.cached(), 1);
        assert_eq!(
            recorder.calls()[2..],
            [(Operation::Delete, "worker-2".to_string(), 0)]
        );
    }

    #[tokio::test]
    async fn test_custom_equivalence_filters_updates() {
        let recorder = Arc::new(Recorder::default());
        let labels_equal: ResourcesEquivalent<Node> =
            Arc::new(|old: &Node, new: &Node| old.labels() == new.labels());
        let mut wl = WatchLoop::new(
            "Node watcher".to_string(),
            recorder.clone(),
            Some(labels_equal),
            RetryPolicy::default(),
        );

        wl.handle_event(watcher::Event::Apply(node("worker-1", "1"))).await;
        // Status-only change (new resourceVersion, same labels)
        wl.handle_event(watcher::Event::Apply(node("worker-1", "2"))).await;

        let mut relabeled = node("worker-1", "3");
        relabeled.metadata.labels = Some(BTreeMap::from([(
            "submariner.io/gateway".to_string(),
            "true".to_string(),
        )]));
        wl.handle_event(watcher::Event::Apply(relabeled)).await;

        let ops: Vec<_> = recorder.calls().into_iter().map(|(op, _, _)| op).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update]);
    }

    #[tokio::test]
    async fn test_failed_callback_is_retried_until_success() {
        let recorder = Arc::new(Recorder::failing(1));
        let mut wl = watch_loop(recorder.clone(), fast_retry(20));

        wl.handle_event(watcher::Event::Apply(node("worker-1", "1"))).await;
        let retry = wl.next_retry().await.expect("Should requeue");
        wl.handle_retry(retry).await;

        assert_eq!(
            recorder.calls(),
            vec![
                (Operation::Create, "worker-1".to_string(), 0),
                (Operation::Create, "worker-1".to_string(), 1),
            ]
        );
        assert_eq!(wl.pending_retries(), 0, "Successful retry must not requeue");
    }

    #[tokio::test]
    async fn test_event_dropped_after_max_requeues() {
        let recorder = Arc::new(Recorder::failing(u32::MAX));
        let mut wl = watch_loop(recorder.clone(), fast_retry(3));

        wl.handle_event(watcher::Event::Delete(node("worker-1", "1"))).await;
        for _ in 0..3 {
            let retry = wl.next_retry().await.expect("Should requeue");
            wl.handle_retry(retry).await;
        }

        let attempts: Vec<_> = recorder.calls().into_iter().map(|(_, _, n)| n).collect();
        assert_eq!(attempts, vec![0, 1, 2, 3]);

        assert_eq!(wl.pending_retries(), 0, "Event must be dropped after max requeues");
    }

    #[tokio::test]
    async fn test_retry_dropped_when_object_deleted_meanwhile() {
        let recorder = Arc::new(Recorder::failing(1));
        let mut wl = watch_loop(recorder.clone(), fast_retry(20));

        wl.handle_event(watcher::Event::Apply(node("worker-1", "1"))).await;
        wl.handle_event(watcher::Event::Delete(node("worker-1", "2"))).await;

        let retry = wl.next_retry().await.expect("Create was requeued");
        wl.handle_retry(retry).await;

        let ops: Vec<_> = recorder.calls().into_iter().map(|(op, _, _)| op).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Delete]);
    }

    #[tokio::test]
    async fn test_delete_retry_dropped_when_object_recreated() {
        let recorder = Arc::new(Recorder::failing(1));
        let mut wl = watch_loop(recorder.clone(), fast_retry(20));

        wl.handle_event(watcher::Event::Delete(node("worker-1", "1"))).await;
        wl.handle_event(watcher::Event::Apply(node("worker-1", "2"))).await;

        let retry = wl.next_retry().await.expect("Delete was requeued");
        wl.handle_retry(retry).await;

        let ops: Vec<_> = recorder.calls().into_iter().map(|(op, _, _)| op).collect();
        assert_eq!(ops, vec![Operation::Delete, Operation::Create]);
        assert_eq!(wl.cached(), 1, "Recreated object stays cached");
        assert_eq!(wl.pending_retries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_waits_for_backoff() {
        let recorder = Arc::new(Recorder::failing(1));
        let mut wl = watch_loop(recorder.clone(), RetryPolicy::default());

        let start = tokio::time::Instant::now();
        wl.handle_event(watcher::Event::Delete(node("worker-1", "1"))).await;
        let retry = wl.next_retry().await.expect("Should requeue");

        assert!(start.elapsed() >= Duration::from_millis(5));
        wl.handle_retry(retry).await;
        assert_eq!(recorder.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_stopping_the_loop_discards_pending_retries() {
        let recorder = Arc::new(Recorder::failing(1));
        let mut wl = watch_loop(recorder.clone(), RetryPolicy::default());

        wl.handle_event(watcher::Event::Delete(node("worker-1", "1"))).await;
        assert_eq!(wl.pending_retries(), 1);

        let pending = recorder.last_seen();
        assert!(pending.upgrade().is_some(), "Retry holds the object");

        drop(wl);
        assert!(
            pending.upgrade().is_none(),
            "Nothing outside the loop keeps the retry alive"
        );
    }

    #[test]
    fn test_same_resource_version() {
        assert!(same_resource_version(&node("a", "5"), &node("a", "5")));
        assert!(!same_resource_version(&node("a", "5"), &node("a", "6")));
        assert!(!same_resource_version(&Node::default(), &Node::default()));
    }

    #[tokio::test]
    async fn test_watcher_construction_fails_for_unmapped_kind() {
        rustls::crypto::ring::default_provider()
            .install_default()
            .ok();
        let client = kube::Client::try_from(kube::Config::new(
            "http://127.0.0.1:1".parse().expect("valid url"),
        ))
        .expect("Client builds without connecting");

        let resources = vec![
            ResourceConfig {
                name: "Node watcher".to_string(),
                api: Api::<Node>::all(client.clone()),
                handler: Arc::new(Recorder::default()) as Arc<dyn ResourceEventHandler<Node>>,
                resources_equivalent: None,
                retry: RetryPolicy::default(),
            }
            .boxed(),
            ResourceConfig {
                name: "Endpoint watcher".to_string(),
                api: Api::<Endpoint>::all(client),
                handler: Arc::new(NoopEndpoints),
                resources_equivalent: None,
                retry: RetryPolicy::default(),
            }
            .boxed(),
        ];

        let mapper = StaticRestMapper::new().with::<Node>();
        let err = match ResourceWatcher::new(&mapper, resources).await {
            Ok(_) => panic!("Endpoint kind is not mapped"),
            Err(e) => e,
        };

        assert!(matches!(err, WatcherError::Mapping { ref kind, .. } if kind == "Endpoint"));
        assert!(err.to_string().contains("submariner.io/v1"));
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let watcher = ResourceWatcher::new(&StaticRestMapper::new(), Vec::new())
            .await
            .expect("Empty watcher builds");

        watcher
            .start(CancellationToken::new())
            .await
            .expect("Nothing to sync");
        assert!(matches!(
            watcher.start(CancellationToken::new()).await,
            Err(WatcherError::AlreadyStarted)
        ));
    }

    struct NoopEndpoints;

    #[async_trait]
    impl ResourceEventHandler<Endpoint> for NoopEndpoints {
        async fn on_create(&self, _obj: Arc<Endpoint>, _num_requeues: u32) -> bool {
            false
        }

        async fn on_update(&self, _obj: Arc<Endpoint>, _num_requeues: u32) -> bool {
            false
        }

        async fn on_delete(&self, _obj: Arc<Endpoint>, _num_requeues: u32) -> bool {
            false
        }
    }
}
