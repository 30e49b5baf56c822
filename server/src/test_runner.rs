#![cfg(test)]

//! This module runs test cases defined in `data/test/cases`.
//!
//! Each test case consists of two files, named in terms of `<name>`, the name of the test case:
//! * `<name>.query`: the path and query string to request
//! * `<name>.json`: the expected response, as `{ "status": <code>, "body": <JSON> }`
//!
//! This runner will start a server over the fixture airports in `data/test/airports.json`, scan
//! that directory for all such pairs of files, execute each request, and make sure the response
//! matches. `"body"` may be omitted to check only the status. Numbers are compared with a small
//! tolerance, since distances are computed with floating point.
//!
//! Use `cargo test -p server` to run the tests.

use super::{Options, Params};
use ansi_term::Color;
use anyhow::Error;
use async_std::task::{sleep, spawn};
use futures::future::join_all;
use portpicker::pick_unused_port;
use serde_json::Value;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;
use model::query::Query;
use surf::{http::StatusCode, Client};

fn workspace() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Start a server over the test fixtures and connect a client to it.
async fn start_server() -> Result<Client, Error> {
    let port = pick_unused_port().unwrap();
    let opt = Options {
        port,
        public: workspace().join("data/test/public"),
        data: workspace().join("data/test/airports.json"),
    };
    spawn(async move {
        opt.serve().await.unwrap();
        tracing::warn!("server exited");
    });

    let client: Client = surf::Config::default()
        .set_base_url(format!("http://localhost:{port}").parse().unwrap())
        .try_into()
        .unwrap();
    // Wait for the server to come up.
    wait_for_server(&client).await?;
    Ok(client)
}

#[async_std::test]
async fn api_test_cases() -> Result<(), Error> {
    model::init_logging();

    // Discover test cases.
    let test_cases = workspace()
        .join("data/test/cases")
        .read_dir()?
        .filter_map(|dirent| {
            let path = dirent.unwrap().path();
            if path.extension()?.to_str().unwrap() == "query" {
                Some(TestCase::new(&path).unwrap())
            } else {
                None
            }
        })
        .collect::<Vec<_>>();
    assert!(!test_cases.is_empty());

    let client = start_server().await?;
    let results = join_all(test_cases.into_iter().map(|test| test.run(client.clone()))).await;
    for result in &results {
        println!("{}", result);
    }
    if results.iter().any(TestResult::failed) {
        Err(Error::msg(format!("{}", Color::Red.paint("tests failed"))))
    } else {
        println!("All test cases passed.");
        Ok(())
    }
}

#[async_std::test]
async fn static_files() -> Result<(), Error> {
    model::init_logging();
    let client = start_server().await?;

    let index = fs::read_to_string(workspace().join("data/test/public/index.html"))?;
    for path in ["/", "/index.html"] {
        let mut res = client.get(path).await.map_err(Error::msg)?;
        assert_eq!(res.status(), StatusCode::Ok, "{path}");
        assert_eq!(res.body_string().await.map_err(Error::msg)?, index, "{path}");
    }

    let res = client.get("/missing.js").await.map_err(Error::msg)?;
    assert_eq!(res.status(), StatusCode::NotFound);
    Ok(())
}

async fn wait_for_server(client: &Client) -> Result<(), Error> {
    for _ in 0..50 {
        match client.get("/api/health").await {
            Ok(res) if res.status() == StatusCode::Ok => return Ok(()),
            Ok(res) => tracing::info!("server not ready: {}", res.status()),
            Err(err) => tracing::info!("server not ready: {err}"),
        }
        sleep(Duration::from_millis(100)).await;
    }
    Err(Error::msg("server did not start"))
}

struct TestCase {
    name: OsString,
    request: String,
    expected: Value,
}

impl TestCase {
    fn new(path: &Path) -> Result<Self, Error> {
        let name = path
            .file_stem()
            .ok_or_else(|| Error::msg(format!("malformed test case {}", path.display())))?
            .to_owned();
        let request = fs::read_to_string(path)?.trim().to_string();
        let expected = serde_json::from_reader(File::open(path.with_extension("json"))?)?;
        Ok(Self {
            name,
            request,
            expected,
        })
    }

    async fn run(self, client: Client) -> TestResult {
        let outcome = match self.send(&client).await {
            Ok(actual) => {
                if matches(&self.expected, &actual) {
                    Outcome::Passed
                } else {
                    Outcome::Mismatch {
                        expected: self.expected,
                        actual,
                    }
                }
            }
            Err(err) => Outcome::Error(err),
        };
        TestResult {
            name: self.name,
            outcome,
        }
    }

    async fn send(&self, client: &Client) -> Result<Value, Error> {
        let mut res = client.get(&self.request).await.map_err(Error::msg)?;
        let status = u16::from(res.status());
        let mut actual = serde_json::json!({ "status": status });
        if self.expected.get("body").is_some() {
            actual["body"] = res.body_json().await.map_err(Error::msg)?;
        }
        Ok(actual)
    }
}

/// Compare JSON values, allowing numbers to differ by rounding error.
fn matches(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => match (e.as_f64(), a.as_f64()) {
            (Some(e), Some(a)) => (e - a).abs() <= 1e-6 * e.abs().max(1.0),
            _ => e == a,
        },
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| matches(e, a))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e
                    .iter()
                    .all(|(k, e)| a.get(k).map_or(false, |a| matches(e, a)))
        }
        _ => expected == actual,
    }
}

enum Outcome {
    Passed,
    Mismatch { expected: Value, actual: Value },
    Error(Error),
}

struct TestResult {
    name: OsString,
    outcome: Outcome,
}

impl TestResult {
    fn failed(&self) -> bool {
        !matches!(self.outcome, Outcome::Passed)
    }
}

impl Display for TestResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = self.name.to_string_lossy();
        match &self.outcome {
            Outcome::Passed => write!(f, "{} {name}", Color::Green.paint("PASSED")),
            Outcome::Mismatch { expected, actual } => {
                writeln!(f, "{} {name}", Color::Red.paint("FAILED"))?;
                writeln!(
                    f,
                    "expected: {}",
                    serde_json::to_string_pretty(expected).unwrap()
                )?;
                write!(
                    f,
                    "actual: {}",
                    serde_json::to_string_pretty(actual).unwrap()
                )
            }
            Outcome::Error(err) => write!(f, "{} {name}: {err:#}", Color::Red.paint("ERROR")),
        }
    }
}

#[test]
fn number_tolerance() {
    use serde_json::json;

    assert!(matches(&json!({"a": [1.0, 2]}), &json!({"a": [1.0000000001, 2]})));
    assert!(!matches(&json!({"a": 1.0}), &json!({"a": 1.1})));
    assert!(!matches(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
}

#[test]
fn origin_must_be_a_real_position() {
    let origin = |lat: f64, lon: f64| {
        Query::try_from(Params {
            lat: Some(lat),
            lon: Some(lon),
            ..Default::default()
        })
        .map(|query| query.origin)
    };

    assert!(origin(37.5, -122.2).unwrap().is_some());
    for (lat, lon) in [
        (f64::NAN, 0.0),
        (0.0, f64::INFINITY),
        (f64::NEG_INFINITY, 0.0),
        (90.1, 0.0),
        (0.0, -181.0),
    ] {
        let err = origin(lat, lon).unwrap_err();
        assert_eq!(err.status(), StatusCode::BadRequest, "{lat}, {lon}");
    }
}
