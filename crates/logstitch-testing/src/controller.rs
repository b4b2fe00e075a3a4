//! In-process controller for end-to-end tests.
//!
//! An actix-web server on a loopback port answers `GET /api/initial-data`
//! for version discovery and `GET /api/analytics/logs` from a [`Dataset`],
//! honoring `start`, `end` and `page_size` the way the real endpoint does.
//! Every request is recorded so tests can inspect query parameters and
//! headers afterwards.

use crate::fixtures::Dataset;
use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, rt, web};
use logstitch_types::{TimeWindow, parse_api_timestamp};
use serde_json::{Value, json};
use std::io;
use std::net::SocketAddr;
use std::sync::mpsc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

const LOGS_PATH: &str = "/api/analytics/logs";

/// A request received by the fake controller.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn from_http(req: &HttpRequest) -> Self {
        // An undecodable query is recorded as empty; the logs route then
        // answers 400 for the missing parameters.
        let query = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();
        let headers = req
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        Self {
            method: req.method().as_str().to_string(),
            path: req.path().to_string(),
            query,
            headers,
        }
    }

    /// First value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values of a repeated query parameter.
    pub fn params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct ControllerState {
    dataset: Dataset,
    version: String,
    fail_logs_on_call: Option<(usize, u16)>,
    log_calls: usize,
    requests: Vec<RecordedRequest>,
}

type SharedState = web::Data<Mutex<ControllerState>>;

fn lock(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    // A panicking test thread must not hide the requests recorded so far.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for [`FakeController`].
pub struct FakeControllerBuilder {
    state: ControllerState,
}

impl FakeControllerBuilder {
    pub fn version(mut self, version: &str) -> Self {
        self.state.version = version.to_string();
        self
    }

    /// Answer the `call`-th logs request (1-based) with `status`.
    pub fn fail_logs_on_call(mut self, call: usize, status: u16) -> Self {
        self.state.fail_logs_on_call = Some((call, status));
        self
    }

    /// Bind a loopback port and serve from a dedicated actix system thread.
    pub fn start(self) -> io::Result<FakeController> {
        let state: SharedState = web::Data::new(Mutex::new(self.state));
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<(SocketAddr, ServerHandle)>>();

        let thread = {
            let state = state.clone();
            std::thread::spawn(move || {
                let result = rt::System::new().block_on(async move {
                    let bound = HttpServer::new(move || {
                        App::new()
                            .app_data(state.clone())
                            .service(
                                web::scope("/api")
                                    .route("/initial-data", web::get().to(initial_data))
                                    .route("/analytics/logs", web::get().to(analytics_logs)),
                            )
                            .default_service(web::to(not_found))
                    })
                    .workers(1)
                    .disable_signals()
                    .shutdown_timeout(1)
                    .bind(("127.0.0.1", 0));

                    let server = match bound {
                        Ok(server) => server,
                        Err(err) => {
                            let _ = ready_tx.send(Err(err));
                            return Ok(());
                        }
                    };
                    let Some(addr) = server.addrs().first().copied() else {
                        let _ = ready_tx.send(Err(io::Error::other("server bound no address")));
                        return Ok(());
                    };
                    let running = server.run();
                    let _ = ready_tx.send(Ok((addr, running.handle())));
                    running.await
                });
                if let Err(err) = result {
                    eprintln!("fake controller stopped with an error: {}", err);
                }
            })
        };

        let (addr, server) = ready_rx
            .recv()
            .map_err(|_| io::Error::other("fake controller exited before binding"))??;

        Ok(FakeController {
            addr,
            state,
            server,
            thread: Some(thread),
        })
    }
}

/// A running fake controller. Stops when dropped.
pub struct FakeController {
    addr: SocketAddr,
    state: SharedState,
    server: ServerHandle,
    thread: Option<JoinHandle<()>>,
}

impl FakeController {
    pub fn builder(dataset: Dataset) -> FakeControllerBuilder {
        FakeControllerBuilder {
            state: ControllerState {
                dataset,
                version: "22.1.3".to_string(),
                fail_logs_on_call: None,
                log_calls: 0,
                requests: Vec::new(),
            },
        }
    }

    pub fn start(dataset: Dataset) -> io::Result<Self> {
        Self::builder(dataset).start()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests made to the logs endpoint, in arrival order.
    pub fn log_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == LOGS_PATH)
            .collect()
    }
}

impl Drop for FakeController {
    fn drop(&mut self) {
        rt::System::new().block_on(self.server.stop(false));
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            eprintln!("fake controller thread panicked");
        }
    }
}

async fn initial_data(req: HttpRequest, state: SharedState) -> HttpResponse {
    let mut state = lock(&state);
    state.requests.push(RecordedRequest::from_http(&req));
    HttpResponse::Ok().json(json!({"version": {"Version": state.version, "build": 9001}}))
}

async fn analytics_logs(req: HttpRequest, state: SharedState) -> HttpResponse {
    let request = RecordedRequest::from_http(&req);
    let mut state = lock(&state);
    state.requests.push(request.clone());
    state.log_calls += 1;

    if let Some((call, status)) = state.fail_logs_on_call
        && call == state.log_calls
    {
        return error_response(status, "internal failure");
    }
    match logs_page(&state, &request) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(message) => error_response(400, &message),
    }
}

async fn not_found(req: HttpRequest, state: SharedState) -> HttpResponse {
    lock(&state).requests.push(RecordedRequest::from_http(&req));
    error_response(404, "not found")
}

fn error_response(status: u16, message: &str) -> HttpResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({"error": message}))
}

fn logs_page(state: &ControllerState, request: &RecordedRequest) -> Result<Value, String> {
    let start = request.param("start").ok_or("missing start")?;
    let end = request.param("end").ok_or("missing end")?;
    let page_size: usize = request
        .param("page_size")
        .ok_or("missing page_size")?
        .parse()
        .map_err(|_| "bad page_size".to_string())?;
    let start = parse_api_timestamp(start).map_err(|e| e.to_string())?;
    let end = parse_api_timestamp(end).map_err(|e| e.to_string())?;
    let window = TimeWindow::new(start, end).map_err(|e| e.to_string())?;

    let total = state.dataset.in_window(&window).len();
    let results: Vec<_> = state
        .dataset
        .page(&window, page_size)
        .iter()
        .map(|r| r.to_json())
        .collect();
    Ok(json!({"count": total, "results": results}))
}
