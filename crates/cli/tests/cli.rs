//! The `acsoap` binary against a fake world server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::Output;

use acsoap::ProtocolOutcome;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_acsoap");

fn reply(tag: &str, text: &str) -> String {
	format!(
		r#"<?xml version="1.0" encoding="UTF-8"?><SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="urn:AC"><SOAP-ENV:Body><ns1:executeCommandResponse><{tag}>{text}&#xD;</{tag}></ns1:executeCommandResponse></SOAP-ENV:Body></SOAP-ENV:Envelope>"#
	)
}

/// Basic auth for `gm:pw`.
const GM_AUTHORIZATION: &str = "Basic Z206cHc=";

async fn soap_handler(headers: HeaderMap, body: String) -> (StatusCode, String) {
	let authorization = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
	let command = body
		.split_once("<command>")
		.and_then(|(_, rest)| rest.split_once("</command>"))
		.map(|(command, _)| command.to_string())
		.unwrap_or_default();
	match command.as_str() {
		".server info" if authorization == Some(GM_AUTHORIZATION) => (
			StatusCode::OK,
			reply("result", "Connected players: 1. Characters in world: 2."),
		),
		".server info" => (
			StatusCode::OK,
			reply("result", "Connected players: 5. Characters in world: 7."),
		),
		".account delete TEST" => (
			StatusCode::INTERNAL_SERVER_ERROR,
			reply("faultstring", "Account not exist: TEST"),
		),
		other => (StatusCode::OK, reply("result", &format!("done: {other}"))),
	}
}

async fn spawn_fake_server() -> SocketAddr {
	let app = Router::new().route("/", post(soap_handler));
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	addr
}

/// Temp dir holding the config file and the blob root.
struct Workspace {
	dir: TempDir,
}

impl Workspace {
	fn new(soap_port: u16, extra: Value) -> Self {
		let dir = TempDir::new().unwrap();
		let mut config = json!({
			"schema": 1,
			"soap": { "host": "127.0.0.1", "port": soap_port },
			"blobRoot": dir.path().join("blobs"),
		});
		if let (Some(config), Value::Object(extra)) = (config.as_object_mut(), extra) {
			config.extend(extra);
		}
		std::fs::write(dir.path().join("config.json"), config.to_string()).unwrap();
		Self { dir }
	}

	fn config_path(&self) -> PathBuf {
		self.dir.path().join("config.json")
	}

	fn blob_path(&self, bucket_key: &str) -> PathBuf {
		self.dir.path().join("blobs").join(bucket_key)
	}

	async fn run(&self, args: &[&str]) -> Output {
		Command::new(BIN)
			.args(args)
			.env("ACSOAP_CONFIG", self.config_path())
			.env_remove("RUST_LOG")
			.output()
			.await
			.unwrap()
	}
}

fn outcome_lines(output: &Output) -> Vec<ProtocolOutcome> {
	String::from_utf8_lossy(&output.stdout)
		.lines()
		.map(|line| ProtocolOutcome::from_json(line).unwrap())
		.collect()
}

fn stderr(output: &Output) -> String {
	String::from_utf8_lossy(&output.stderr).into_owned()
}

fn closed_port() -> u16 {
	let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
	listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn gm_prints_one_outcome_per_line() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));

	let output = ws.run(&["gm", ".server info", ".gm list"]).await;

	assert!(output.status.success(), "{}", stderr(&output));
	let outcomes = outcome_lines(&output);
	assert_eq!(outcomes.len(), 2);
	assert_eq!(outcomes[0].message, "Connected players: 5. Characters in world: 7.");
	assert_eq!(outcomes[1].message, "done: .gm list");
	assert!(outcomes.iter().all(|o| o.succeeded));
}

#[tokio::test]
async fn gm_fault_exits_non_zero_when_raising() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));

	let output = ws.run(&["gm", ".account delete TEST"]).await;

	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty());
	assert!(stderr(&output).contains("[COMMAND_FAILED]"), "{}", stderr(&output));
}

#[tokio::test]
async fn gm_fault_is_reported_when_not_raising() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));

	let output = ws.run(&["gm", "--raises=false", "--", ".account delete TEST", ".server info"]).await;

	assert!(output.status.success(), "{}", stderr(&output));
	let flags: Vec<_> = outcome_lines(&output).iter().map(|o| o.succeeded).collect();
	assert_eq!(flags, [false, true]);
}

#[tokio::test]
async fn gm_writes_outcomes_to_the_output_location() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));

	let output = ws
		.run(&["gm", "--output-location=s3://bucket/out.json", ".server info"])
		.await;

	assert!(output.status.success(), "{}", stderr(&output));
	assert!(output.stdout.is_empty());
	let stored: Vec<ProtocolOutcome> =
		serde_json::from_str(&std::fs::read_to_string(ws.blob_path("bucket/out.json")).unwrap()).unwrap();
	assert_eq!(stored.len(), 1);
	assert!(stored[0].succeeded);
}

#[tokio::test]
async fn batch_gm_reads_requests_from_the_blob_root() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));
	let input = ws.blob_path("bucket/in.json");
	std::fs::create_dir_all(input.parent().unwrap()).unwrap();
	std::fs::write(&input, r#"[{"command":".server info"},{"command":".gm list","username":"gm"}]"#).unwrap();

	let output = ws.run(&["batch-gm", "s3://bucket/in.json"]).await;

	assert!(output.status.success(), "{}", stderr(&output));
	assert_eq!(outcome_lines(&output).len(), 2);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
	let ws = Workspace::new(closed_port(), json!({}));

	let output = ws.run(&["gm", ".server info"]).await;

	assert_eq!(output.status.code(), Some(1));
	assert!(stderr(&output).contains("[TRANSPORT_ERROR]"), "{}", stderr(&output));
}

#[tokio::test]
async fn count_online_players_reports_offline_instead_of_failing() {
	let ws = Workspace::new(closed_port(), json!({}));

	let output = ws.run(&["canned", "count-online-players", "-f", "ndjson"]).await;

	assert!(output.status.success(), "{}", stderr(&output));
	let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(envelope["ok"], true);
	assert_eq!(envelope["data"]["server_is_online"], false);
	assert_eq!(envelope["data"]["connected_players"], Value::Null);
}

#[tokio::test]
async fn count_online_players_reads_server_info() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));

	let output = ws.run(&["canned", "count-online-players"]).await;

	let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(envelope["data"]["connected_players"], 5);
	assert_eq!(envelope["data"]["characters_in_world"], 7);
	assert_eq!(envelope["data"]["server_is_online"], true);
}

#[tokio::test]
async fn count_online_players_uses_credential_flags() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(addr.port(), json!({}));

	let output = ws.run(&["canned", "count-online-players", "--user", "gm", "--pwd", "pw"]).await;

	assert!(output.status.success(), "{}", stderr(&output));
	let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(envelope["data"]["connected_players"], 1);
	assert_eq!(envelope["data"]["characters_in_world"], 2);
}

#[tokio::test]
async fn remote_with_unknown_server_is_a_configuration_error() {
	let ws = Workspace::new(closed_port(), json!({}));

	let output = ws.run(&["remote", "prd-red", ".server info"]).await;

	assert_eq!(output.status.code(), Some(1));
	assert!(stderr(&output).contains("[CONFIGURATION_ERROR]"), "{}", stderr(&output));
}

#[cfg(unix)]
#[tokio::test]
async fn remote_runs_gm_on_the_host_and_decodes_its_output() {
	let addr = spawn_fake_server().await;
	let ws = Workspace::new(
		addr.port(),
		json!({
			"executorPath": BIN,
			"poll": { "initialDelayMs": 50, "delayMs": 50, "timeoutMs": 30000 },
			"servers": { "sbx-blue": { "endpointId": "local" } },
		}),
	);

	let output = ws.run(&["remote", "sbx-blue", ".server info", ".gm list"]).await;

	assert!(output.status.success(), "{}", stderr(&output));
	let envelope: Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(envelope["command"], "remote");
	assert_eq!(envelope["data"]["serverId"], "sbx-blue");
	let outcomes = envelope["data"]["outcomes"].as_array().unwrap();
	assert_eq!(outcomes.len(), 2);
	assert_eq!(outcomes[1]["message"], "done: .gm list");
}

#[cfg(unix)]
#[tokio::test]
async fn remote_stopped_host_is_reported() {
	let ws = Workspace::new(
		closed_port(),
		json!({ "servers": { "sbx-green": { "endpointId": "local", "isRunning": false } } }),
	);

	let output = ws.run(&["remote", "sbx-green", ".server info"]).await;

	assert_eq!(output.status.code(), Some(1));
	assert!(stderr(&output).contains("[HOST_NOT_RUNNING]"), "{}", stderr(&output));
}
