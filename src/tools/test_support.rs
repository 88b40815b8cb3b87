//! Local stand-in for the weather and news providers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;

pub(crate) struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockUpstream {
    /// Serve `body` with `status` on every GET to `{base_url}`.
    pub async fn serve(status: u16, body: impl Into<String>) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let queries = Arc::new(Mutex::new(Vec::new()));
        let status = StatusCode::from_u16(status).unwrap();
        let body: String = body.into();

        let handler = {
            let hits = hits.clone();
            let queries = queries.clone();
            move |Query(q): Query<HashMap<String, String>>| {
                hits.fetch_add(1, Ordering::SeqCst);
                queries.lock().unwrap().push(q);
                let body = body.clone();
                async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }
            }
        };

        let app = Router::new().route("/data", get(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/data"),
            hits,
            queries,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.queries.lock().unwrap().last().cloned().unwrap_or_default()
    }
}
