use std::convert::Infallible;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, CONNECTION, HOST, UPGRADE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::upgrade::Upgraded;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use proxyforge_domain::config::RotationStrategy;
use tokio::io::copy_bidirectional;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

use super::pool::HotPool;
use super::upstream_dial::dial_tunnel;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

fn empty_body() -> BoxBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

fn full_body(bytes: Bytes) -> BoxBody {
    Full::new(bytes).map_err(|never| match never {}).boxed()
}

/// The rotating forward-proxy gateway's listener. Plain
/// `hyper`/`hyper-util`, not axum: this is a raw protocol forwarder, not a
/// REST surface.
pub struct GatewayServer {
    pool: Arc<HotPool>,
    strategy: RotationStrategy,
    round_robin_counter: Arc<AtomicUsize>,
}

impl GatewayServer {
    pub fn new(pool: Arc<HotPool>, strategy: RotationStrategy) -> Self {
        Self {
            pool,
            strategy,
            round_robin_counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[instrument(skip(self))]
    pub async fn serve(self: Arc<Self>, listen_addr: std::net::SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(listen_addr).await?;
        info!(%listen_addr, "gateway listening");

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "gateway accept failed");
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { server.route(req).await }
                });

                if let Err(e) = http1::Builder::new()
                    .serve_connection(io, service)
                    .with_upgrades()
                    .await
                {
                    warn!(%peer, error = %e, "gateway connection error");
                }
            });
        }
    }

    async fn pick_upstream(&self) -> Option<proxyforge_domain::ProxyRecord> {
        match self.strategy {
            RotationStrategy::Random => self.pool.pick_random().await,
            RotationStrategy::RoundRobin => {
                self.pool.pick_round_robin(&self.round_robin_counter).await
            }
        }
    }

    async fn route(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<BoxBody>, Infallible> {
        if req.method() == Method::CONNECT {
            return Ok(self.handle_connect(req).await);
        }
        Ok(self.handle_forward(req).await)
    }

    async fn handle_connect(&self, req: Request<Incoming>) -> Response<BoxBody> {
        let Some(authority) = req.uri().authority().cloned() else {
            return bad_request("CONNECT target must be host:port");
        };
        let host = authority.host().to_string();
        let port = authority.port_u16().unwrap_or(443);

        let Some(upstream) = self.pick_upstream().await else {
            return service_unavailable();
        };

        let mut upstream_stream = match dial_tunnel(&upstream, &host, port).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, %host, port, "upstream CONNECT dial failed");
                return bad_gateway();
            }
        };

        tokio::spawn(async move {
            match hyper::upgrade::on(req).await {
                Ok(upgraded) => {
                    if let Err(e) = relay(&mut TokioIo::new(upgraded), &mut upstream_stream).await
                    {
                        warn!(error = %e, "gateway tunnel relay ended");
                    }
                }
                Err(e) => error!(error = %e, "failed to upgrade CONNECT client connection"),
            }
        });

        Response::builder()
            .status(StatusCode::OK)
            .body(empty_body())
            .expect("valid response")
    }

    async fn handle_forward(&self, req: Request<Incoming>) -> Response<BoxBody> {
        let Some(upstream) = self.pick_upstream().await else {
            return service_unavailable();
        };

        let Some(authority) = req.uri().authority().cloned() else {
            return bad_request("absolute-URI request required");
        };
        let host = authority.host().to_string();
        let port = authority.port_u16().unwrap_or(80);
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();

        let stream = match dial_tunnel(&upstream, &host, port).await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, %host, port, "upstream dial failed");
                return bad_gateway();
            }
        };

        let io = TokioIo::new(stream);
        let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
            Ok(pair) => pair,
            Err(e) => {
                error!(error = %e, "handshake with upstream failed");
                return bad_gateway();
            }
        };
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                warn!(error = %e, "upstream connection closed");
            }
        });

        let method = req.method().clone();
        let headers = strip_hop_by_hop(req.headers());
        let body = req.into_body();

        let mut outbound = Request::builder()
            .method(method)
            .uri(path)
            .header(HOST, format!("{host}:{port}"));
        for (name, value) in headers.iter() {
            outbound = outbound.header(name, value);
        }
        let outbound = match outbound.body(body) {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "failed to build outbound request");
                return bad_gateway();
            }
        };

        match sender.send_request(outbound).await {
            Ok(resp) => {
                let (parts, body) = resp.into_parts();
                let mut builder = Response::builder().status(parts.status);
                for (name, value) in strip_response_headers(&parts.headers).iter() {
                    builder = builder.header(name, value);
                }
                builder
                    .body(body.map_err(|e| e).boxed())
                    .unwrap_or_else(|_| bad_gateway())
            }
            Err(e) => {
                error!(error = %e, "upstream request failed");
                bad_gateway()
            }
        }
    }
}

fn strip_hop_by_hop(headers: &hyper::HeaderMap) -> hyper::HeaderMap {
    let proxy_connection = HeaderName::from_static("proxy-connection");
    let mut out = hyper::HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if name == HOST || name == CONNECTION || name == UPGRADE || name == proxy_connection {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

fn strip_response_headers(headers: &hyper::HeaderMap) -> hyper::HeaderMap {
    use hyper::header::{CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING};
    let mut out = hyper::HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if name == CONTENT_ENCODING
            || name == CONTENT_LENGTH
            || name == TRANSFER_ENCODING
            || name == CONNECTION
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

async fn relay(
    client: &mut TokioIo<Upgraded>,
    upstream: &mut tokio::net::TcpStream,
) -> std::io::Result<()> {
    copy_bidirectional(client, upstream).await.map(|_| ())
}

fn bad_gateway() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::BAD_GATEWAY)
        .body(full_body(Bytes::from_static(b"Bad Gateway")))
        .expect("valid response")
}

fn service_unavailable() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .body(full_body(Bytes::from_static(b"No proxies available")))
        .expect("valid response")
}

fn bad_request(msg: &'static str) -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .body(full_body(Bytes::from_static(msg.as_bytes())))
        .expect("valid response")
}
