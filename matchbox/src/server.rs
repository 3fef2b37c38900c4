use crate::config::RuntimeConfig;
use crate::engine::matchengine::{MatchBook, MatchFinder, MatchOptions};
use crate::match_service::MatchServiceSVC;
use crate::metrics;
use crate::store::Stores;

use anyhow::Context;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, StatusCode};
use std::net::SocketAddr;

pub struct Server {
    config: &'static RuntimeConfig,
    service: MatchServiceSVC,
}

impl Server {
    /// Opens the configured stores and wires the engine to them
    pub async fn builder(config: &'static RuntimeConfig) -> anyhow::Result<Self> {
        let stores = Stores::open(&config.store)
            .await
            .context("failed to open stores")?;
        let options = MatchOptions {
            max_concurrent_reads: config.matching.max_concurrent_reads,
            locality: config.matching.locality,
        };
        let finder = MatchFinder::from_stores(&stores, options);
        let book = MatchBook::new(stores.recorder.clone());
        log::info!(
            "match engine ready, store {:?}, locality {:?}",
            config.store.kind,
            options.locality
        );
        Ok(Server {
            config,
            service: MatchServiceSVC::new(finder, book),
        })
    }

    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.start_http_server().await?;
        self.start_metrics_server().await?;
        Ok(())
    }

    pub fn stop(&mut self) {
        log::info!("server stop");
    }

    async fn start_http_server(&mut self) -> anyhow::Result<()> {
        let addr: SocketAddr = self
            .config
            .addr
            .parse()
            .with_context(|| format!("invalid addr {}", self.config.addr))?;
        let service = self.service.clone();
        let make_svc = make_service_fn(move |_| {
            let service = service.clone();
            async move {
                Ok::<_, hyper::Error>(service_fn(move |request: Request<Body>| {
                    let service = service.clone();
                    async move { Ok::<_, hyper::Error>(service.handle(request).await) }
                }))
            }
        });
        let server = hyper::Server::try_bind(&addr)
            .with_context(|| format!("failed to bind {}", addr))?
            .serve(make_svc);
        tokio::spawn(async move {
            if let Err(e) = server.await {
                log::error!("http server error: {}", e);
            }
        });
        log::info!("http server started on {}", addr);
        Ok(())
    }

    async fn start_metrics_server(&mut self) -> anyhow::Result<()> {
        let addr: SocketAddr = self
            .config
            .metrics_addr
            .parse()
            .with_context(|| format!("invalid metrics_addr {}", self.config.metrics_addr))?;
        let make_svc = make_service_fn(move |_| async move {
            Ok::<_, hyper::Error>(service_fn(move |_: Request<Body>| async move {
                let response = match metrics::gather_text() {
                    Ok(buffer) => Response::new(Body::from(buffer)),
                    Err(e) => {
                        log::error!("failed to encode metrics: {}", e);
                        let mut response = Response::new(Body::empty());
                        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                        response
                    }
                };
                Ok::<_, hyper::Error>(response)
            }))
        });
        metrics::init_registry();
        let server = hyper::Server::try_bind(&addr)
            .with_context(|| format!("failed to bind {}", addr))?
            .serve(make_svc);
        tokio::spawn(async move {
            if let Err(e) = server.await {
                log::error!("metrics server error: {}", e);
            }
        });
        log::info!("metrics server started on {}", addr);
        Ok(())
    }
}
