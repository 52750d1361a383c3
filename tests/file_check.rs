// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod common;

use common::ftp_server::{FakeFtpServer, Silence};
use ftpcheck::context::{CancellationToken, CheckContext};
use ftpcheck::criteria::Criteria;
use ftpcheck::error::CheckError;
use ftpcheck::{CheckRequest, CheckResult, FileCheck, run_check};
use std::thread;
use std::time::{Duration, Instant};

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn request(server: &FakeFtpServer, path: &str, criteria: &str) -> CheckRequest {
    CheckRequest::new(server.target(), path).with_criteria(criteria.parse::<Criteria>().unwrap())
}

fn bounded() -> CheckContext {
    CheckContext::with_timeout(Duration::from_secs(10))
}

#[test]
fn test_exact_match_over_real_ftp() {
    let server = FakeFtpServer::builder()
        .file("/pub/readme.txt", b"hello world")
        .start();

    let result = run_check(
        &bounded(),
        &request(&server, "/pub/readme.txt", "match=hello world"),
    );

    assert_eq!(result, CheckResult::pass());
    assert_eq!(
        server.logins(),
        vec![("anonymous".to_string(), "anonymous".to_string())]
    );
}

#[test]
fn test_exact_match_mismatch_over_real_ftp() {
    let server = FakeFtpServer::builder()
        .file("/pub/readme.txt", b"hello")
        .start();

    let result = run_check(
        &bounded(),
        &request(&server, "/pub/readme.txt", "match=hello world"),
    );

    assert!(!result.success);
    assert!(result.reason.starts_with("match mismatch"), "{}", result.reason);
}

#[test]
fn test_sha256_and_substring_together() {
    let server = FakeFtpServer::builder().file("/hello.txt", b"hello").start();

    let criteria = format!("exists;substring_match=ell;sha256={HELLO_SHA256}");
    let result = run_check(&bounded(), &request(&server, "/hello.txt", &criteria));

    assert!(result.success, "{}", result.reason);
}

#[test]
fn test_binary_body_digest() {
    let body: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    let server = FakeFtpServer::builder().file("/blob.bin", &body).start();

    let criteria = format!(
        "md5={}",
        ftpcheck::checksum::calculate_digest(ftpcheck::checksum::DigestAlgorithm::Md5, &body)
    );
    let result = run_check(&bounded(), &request(&server, "/blob.bin", &criteria));

    assert!(result.success, "{}", result.reason);
}

#[test]
fn test_missing_file() {
    let server = FakeFtpServer::builder().file("/present", b"x").start();

    let err = FileCheck::new()
        .execute(&bounded(), &request(&server, "/absent", "exists"))
        .unwrap_err();

    assert!(matches!(err, CheckError::Retrieval(_)), "{err}");
    assert!(err.to_string().contains("550"));
}

#[test]
fn test_rejected_credentials() {
    let server = FakeFtpServer::builder()
        .file("/f", b"x")
        .account("alice", "secret")
        .start();

    let request = CheckRequest::new(server.target(), "/f").with_credentials("alice", "wrong");
    let err = FileCheck::new().execute(&bounded(), &request).unwrap_err();

    assert!(matches!(err, CheckError::Authentication(_)), "{err}");
    assert_eq!(
        server.logins(),
        vec![("alice".to_string(), "wrong".to_string())]
    );
}

#[test]
fn test_accepted_credentials() {
    let server = FakeFtpServer::builder()
        .file("/f", b"x")
        .account("alice", "secret")
        .start();

    let request = CheckRequest::new(server.target(), "/f").with_credentials("alice", "secret");

    assert!(run_check(&bounded(), &request).success);
}

#[test]
fn test_unreachable_target() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let target = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = run_check(&bounded(), &CheckRequest::new(target, "/f"));

    assert!(!result.success);
    assert!(result.reason.starts_with("failed to connect to target"));
}

#[test]
fn test_stalled_transfer_hits_deadline() {
    let server = FakeFtpServer::builder()
        .stalled_file("/slow", b"hel")
        .start();

    let ctx = CheckContext::with_timeout(Duration::from_millis(800));
    let start = Instant::now();
    let err = FileCheck::new()
        .execute(&ctx, &request(&server, "/slow", "match=hello"))
        .unwrap_err();

    assert!(matches!(err, CheckError::Read(_)), "{err}");
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[test]
fn test_cancellation_during_transfer() {
    let server = FakeFtpServer::builder()
        .stalled_file("/slow", b"hel")
        .start();

    let token = CancellationToken::new();
    let ctx = CheckContext::new(token.clone());
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        token.cancel();
    });

    let start = Instant::now();
    let result = FileCheck::new().run(&ctx, &request(&server, "/slow", "exists"));
    canceller.join().unwrap();

    assert_eq!(result, CheckResult::fail("failed to read file: check cancelled"));
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[test]
fn test_cancelled_before_start() {
    let server = FakeFtpServer::builder().file("/f", b"x").start();

    let token = CancellationToken::new();
    token.cancel();
    let result = run_check(
        &CheckContext::new(token),
        &CheckRequest::new(server.target(), "/f"),
    );

    assert_eq!(
        result,
        CheckResult::fail("failed to connect to target: check cancelled")
    );
    assert!(server.logins().is_empty());
}

fn cancel_while_server_is_silent(silence: Silence) -> (CheckResult, Duration) {
    let server = FakeFtpServer::builder()
        .file("/f", b"x")
        .silent(silence)
        .start();

    let token = CancellationToken::new();
    let ctx = CheckContext::new(token.clone());
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        token.cancel();
    });

    let start = Instant::now();
    let result = FileCheck::new().run(&ctx, &CheckRequest::new(server.target(), "/f"));
    canceller.join().unwrap();
    (result, start.elapsed())
}

#[test]
fn test_cancellation_while_awaiting_greeting() {
    let (result, elapsed) = cancel_while_server_is_silent(Silence::Greeting);

    assert_eq!(
        result,
        CheckResult::fail("failed to connect to target: check cancelled")
    );
    assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
}

#[test]
fn test_cancellation_while_awaiting_login_reply() {
    let (result, elapsed) = cancel_while_server_is_silent(Silence::AfterUser);

    assert_eq!(
        result,
        CheckResult::fail("failed to login to target: check cancelled")
    );
    assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
}

#[test]
fn test_cancellation_while_awaiting_retrieve_reply() {
    let (result, elapsed) = cancel_while_server_is_silent(Silence::AfterRetr);

    assert_eq!(
        result,
        CheckResult::fail("failed to retrieve file: check cancelled")
    );
    assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
}

#[test]
fn test_deadline_while_awaiting_login_reply() {
    let server = FakeFtpServer::builder()
        .file("/f", b"x")
        .silent(Silence::AfterUser)
        .start();

    let ctx = CheckContext::with_timeout(Duration::from_millis(500));
    let start = Instant::now();
    let err = FileCheck::new()
        .execute(&ctx, &CheckRequest::new(server.target(), "/f"))
        .unwrap_err();

    assert!(matches!(err, CheckError::Authentication(_)), "{err}");
    assert!(start.elapsed() < Duration::from_secs(2));
}
