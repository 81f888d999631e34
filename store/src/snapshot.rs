use futures::{StreamExt, TryStreamExt};
use kube::api::{Api, ListParams, WatchEvent, WatchParams};
use kube::ResourceExt;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const RESUME_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

/// One consistent view of a resource collection. `loaded` turns true after
/// the first successful list; `error` reports staleness without discarding
/// the last good item set.
#[derive(Clone, Debug)]
pub struct Snapshot<K> {
    pub items: Vec<Arc<K>>,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: None,
        }
    }
}

impl<K> Snapshot<K> {
    pub fn ready(items: Vec<Arc<K>>) -> Self {
        Self {
            items,
            loaded: true,
            error: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.loaded && self.error.is_none()
    }
}

pub type SnapshotReceiver<K> = watch::Receiver<Snapshot<K>>;

/// Maintains a reactive snapshot of a collection: an initial list, then a
/// watch stream applied to a name-keyed map. Every change publishes a fresh
/// snapshot to the returned receiver. Watch failures mark the snapshot stale
/// and the loop re-lists after a fixed delay.
pub fn watch_collection<K>(api: Api<K>) -> (SnapshotReceiver<K>, JoinHandle<()>)
where
    K: kube::Resource + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(Snapshot::default());
    let handle = tokio::task::spawn(async move {
        let mut items = BTreeMap::new();
        loop {
            match run_watch(&api, &mut items, &tx).await {
                Ok(()) => debug!("Watch stream ended, resuming"),
                Err(err) => {
                    warn!(?err, "Collection watch failed");
                    tx.send_modify(|snapshot| snapshot.error = Some(err.to_string()));
                }
            }
            tokio::time::sleep(RESUME_DELAY).await;
        }
    });
    (rx, handle)
}

async fn run_watch<K>(
    api: &Api<K>,
    items: &mut BTreeMap<String, Arc<K>>,
    tx: &watch::Sender<Snapshot<K>>,
) -> kube::Result<()>
where
    K: kube::Resource + Clone + DeserializeOwned + Debug + Send,
{
    let list = api.list(&ListParams::default()).await?;
    items.clear();
    for item in list {
        items.insert(item.name_any(), Arc::new(item));
    }
    publish(tx, items);

    let mut stream = api.watch(&WatchParams::default(), "0").await?.boxed();
    while let Some(event) = stream.try_next().await? {
        match event {
            WatchEvent::Added(item) | WatchEvent::Modified(item) => {
                items.insert(item.name_any(), Arc::new(item));
            }
            WatchEvent::Deleted(item) => {
                items.remove(&item.name_any());
            }
            WatchEvent::Bookmark(_) => continue,
            WatchEvent::Error(err) => return Err(kube::Error::Api(err)),
        }
        publish(tx, items);
    }
    Ok(())
}

fn publish<K>(tx: &watch::Sender<Snapshot<K>>, items: &BTreeMap<String, Arc<K>>) {
    tx.send_replace(Snapshot::ready(items.values().cloned().collect()));
}
