use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Result;

use super::client::{FetchError, InboxQuery, InboxSource};
use super::types::Message;

/// A fetch the app wants issued; `token` identifies its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: u64,
    pub query: InboxQuery,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub token: u64,
    pub result: Result<Vec<Message>, FetchError>,
}

/// Runs each fetch on its own thread and hands results back over a channel
pub struct FetchWorker {
    source: Arc<dyn InboxSource>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn InboxSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    pub fn spawn(&self, request: FetchRequest) -> Result<()> {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name(format!("inbox-fetch-{}", request.token))
            .spawn(move || {
                let result = source.fetch(&request.query);
                // Receiver gone means the UI has exited
                let _ = tx.send(FetchOutcome {
                    token: request.token,
                    result,
                });
            })?;
        Ok(())
    }

    /// Collect finished fetches without blocking
    pub fn drain(&self) -> Vec<FetchOutcome> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct Fixed;

    impl InboxSource for Fixed {
        fn fetch(&self, query: &InboxQuery) -> Result<Vec<Message>, FetchError> {
            if query.api_key.is_empty() {
                return Err(FetchError::Rejected("missing key".into()));
            }
            Ok(vec![Message {
                id: query.namespace.clone(),
                ..Default::default()
            }])
        }
    }

    fn wait_for(worker: &FetchWorker, n: usize) -> Vec<FetchOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut got = Vec::new();
        while got.len() < n && Instant::now() < deadline {
            got.extend(worker.drain());
            thread::sleep(Duration::from_millis(5));
        }
        got
    }

    #[test]
    fn test_outcomes_carry_tokens() {
        let worker = FetchWorker::new(Arc::new(Fixed));
        let query = |ns: &str, key: &str| InboxQuery {
            base_url: "http://unused".into(),
            namespace: ns.into(),
            api_key: key.into(),
        };
        worker
            .spawn(FetchRequest {
                token: 1,
                query: query("ns", "key"),
            })
            .unwrap();
        worker
            .spawn(FetchRequest {
                token: 2,
                query: query("ns", ""),
            })
            .unwrap();

        let mut outcomes = wait_for(&worker, 2);
        outcomes.sort_by_key(|o| o.token);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].result.as_ref().unwrap()[0].id, "ns");
        assert!(outcomes[1].result.is_err());
    }
}
