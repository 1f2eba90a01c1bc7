// SPDX-FileCopyrightText: 2026 MIRACL UK LTD
//
// SPDX-License-Identifier: Apache-2.0

//! Seed scenarios S1-S6 from the specification's testable-properties
//! section, run against `wiremock` in place of the platform API and the
//! in-memory doubles for crypto, PIN entry and storage.

use std::sync::atomic::{AtomicUsize, Ordering};

use mpin_apiclient::ApiClient;
use mpin_common::{crypto::mock::MockCryptoProvider, secret::SecretPin};
use mpin_coreclient::{
    authenticator::{AuthenticationError, Authenticator, Scope},
    document_signer::{DocumentSigner, SigningError, SigningSessionDetails},
    pin::FixedPinProvider,
    registrator::Registrator,
    session_coordinator::SessionCoordinator,
    store::{sqlite::SqliteUserStore, UserStore},
    user_record::UserRecord,
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

const PROJECT_ID: &str = "proj-1";
const DEVICE_NAME: &str = "integration-test-device";

async fn server() -> MockServer {
    MockServer::start().await
}

fn pin(digits: &str) -> FixedPinProvider {
    FixedPinProvider(SecretPin::from(digits.to_string()))
}

async fn mock_register(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rps/v2/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "mpinId": "01",
            "regOTT": "R",
            "dtas": "D",
            "pinLength": 4,
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rps/v2/signature/01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "clientSecretShareURL": "/share1",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/share1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "clientSecretShare": "10",
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rps/v2/dvsregister"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "mpinId": "01aa",
            "dtas": "D2",
            "dvsClientSecretShareURL": "/share2",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/share2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "clientSecretShare": "20",
        })))
        .mount(server)
        .await;
}

/// S1 Happy register: the resulting record carries `register`'s mpinId/
/// dtas (not the DVS-register response's) and is persisted exactly once.
#[tokio::test]
async fn s1_happy_register_persists_one_record() {
    let server = server().await;
    mock_register(&server).await;

    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("1234");

    let record = Registrator::new(&api_client, &crypto, &store)
        .register("alice@example.com", PROJECT_ID, "AT", DEVICE_NAME, &pin_provider)
        .await
        .unwrap();

    assert_eq!(record.mpin_id, vec![0x01]);
    assert_eq!(record.dtas, "D");
    assert_eq!(record.public_key, Some(vec![0xAA]));

    let all = store.all(PROJECT_ID).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].user_id, "alice@example.com");
}

/// S5's universal-property cousin: registering the same (userId,
/// projectId) twice overwrites rather than duplicating.
#[tokio::test]
async fn registering_twice_overwrites() {
    let server = server().await;
    mock_register(&server).await;

    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("1234");
    let registrator = Registrator::new(&api_client, &crypto, &store);

    registrator
        .register("alice@example.com", PROJECT_ID, "AT", DEVICE_NAME, &pin_provider)
        .await
        .unwrap();
    registrator
        .register("alice@example.com", PROJECT_ID, "AT", DEVICE_NAME, &pin_provider)
        .await
        .unwrap();

    assert_eq!(store.all(PROJECT_ID).await.unwrap().len(), 1);
}

fn revoked_record(user_id: &str) -> UserRecord {
    UserRecord {
        user_id: user_id.to_string(),
        project_id: PROJECT_ID.to_string(),
        revoked: true,
        pin_length: 4,
        mpin_id: vec![0x01],
        token: mpin_common::SecretBytes::new(vec![0x02]),
        dtas: "D".into(),
        public_key: Some(vec![0xAA]),
    }
}

fn usable_record(user_id: &str) -> UserRecord {
    let mut record = revoked_record(user_id);
    record.revoked = false;
    record
}

/// S2 Authenticate revoked: a revoked record fails fast with no network
/// activity reaching the platform.
#[tokio::test]
async fn s2_authenticate_revoked_fails_before_any_request() {
    let server = server().await;
    // Deliberately no mocks mounted: any request would 404.
    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("1234");

    let user = revoked_record("bob@example.com");
    let result = Authenticator::new(&api_client, &crypto, &store)
        .authenticate(&user, DEVICE_NAME, None, Scope::Jwt, &pin_provider)
        .await;

    assert!(matches!(result, Err(AuthenticationError::Revoked)));
}

/// Alternates between two JSON bodies on successive requests to the same
/// endpoint - used to model the server's second, different answer in the
/// renewal and signing-session scenarios.
struct Sequenced {
    first: serde_json::Value,
    rest: serde_json::Value,
    calls: AtomicUsize,
}

impl Sequenced {
    fn new(first: serde_json::Value, rest: serde_json::Value) -> Self {
        Self {
            first,
            rest,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequenced {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let body = if call == 0 { &self.first } else { &self.rest };
        ResponseTemplate::new(200).set_body_json(body)
    }
}

async fn mock_pass1_pass2(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rps/v2/pass1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Y": "01"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rps/v2/pass2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"authOTT": "OTT"})),
        )
        .mount(server)
        .await;
}

/// S3 Renewal: the first authenticate response asks for a secret
/// rotation; the Authenticator runs `overrideRegistration` and recurses
/// once, returning the second attempt's JWT.
#[tokio::test]
async fn s3_renewal_recurses_once_and_persists_the_new_record() {
    let server = server().await;
    mock_pass1_pass2(&server).await;
    Mock::given(method("POST"))
        .and(path("/rps/v2/authenticate"))
        .respond_with(Sequenced::new(
            serde_json::json!({"status": "200", "dvsRegister": {"token": "NT"}}),
            serde_json::json!({"status": "200", "jwt": "J"}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rps/v2/dvsregister"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "mpinId": "01ab",
            "dtas": "D3",
            "dvsClientSecretShareURL": "/renewal-share2",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/renewal-share2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "clientSecretShare": "30",
        })))
        .mount(&server)
        .await;

    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("1234");
    let original = usable_record("carol@example.com");
    store.add(&original).await.unwrap();

    let result = Authenticator::new(&api_client, &crypto, &store)
        .authenticate(&original, DEVICE_NAME, None, Scope::Jwt, &pin_provider)
        .await
        .unwrap();

    assert_eq!(result.jwt.as_deref(), Some("J"));

    let all = store.all(PROJECT_ID).await.unwrap();
    assert_eq!(all.len(), 1);
    // Renewal rotates only the DVS signing half; the base mpinId/dtas
    // persisted from the original registration are carried over unchanged.
    assert_eq!(all[0].mpin_id, original.mpin_id);
    assert_eq!(all[0].dtas, original.dtas);
    assert_ne!(all[0].token.expose(), original.token.expose());
}

/// S4 Pass-1 reveals revocation: an `MPINID_EXPIRED` pass-1 error maps to
/// `Revoked` and is persisted locally.
#[tokio::test]
async fn s4_pass1_expired_revokes_locally() {
    let server = server().await;
    Mock::given(method("POST"))
        .and(path("/rps/v2/pass1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "MPINID_EXPIRED",
        })))
        .mount(&server)
        .await;

    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("1234");
    let user = usable_record("dan@example.com");
    store.add(&user).await.unwrap();

    let result = Authenticator::new(&api_client, &crypto, &store)
        .authenticate_and_revoke_on_signal(&user, DEVICE_NAME, None, Scope::Jwt, &pin_provider)
        .await;

    assert!(matches!(result, Err(AuthenticationError::Revoked)));
    let stored = store
        .get("dan@example.com", PROJECT_ID)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.revoked);
}

/// S5 Signing with session: an `"active"` completion is rejected as
/// `InvalidSigningSession`; a `"signed"` completion succeeds.
#[tokio::test]
async fn s5_signing_with_session_requires_signed_status() {
    let server = server().await;
    mock_pass1_pass2(&server).await;
    Mock::given(method("POST"))
        .and(path("/rps/v2/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "200",
            "jwt": "J",
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/dvs/session"))
        .respond_with(Sequenced::new(
            serde_json::json!({"status": "active"}),
            serde_json::json!({"status": "signed"}),
        ))
        .mount(&server)
        .await;

    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("1234");
    let user = usable_record("erin@example.com");
    store.add(&user).await.unwrap();

    let signer = DocumentSigner::new(&api_client, &crypto, &store);
    let session = SigningSessionDetails {
        session_id: "S".to_string(),
    };

    let first = signer
        .sign(
            "erin@example.com",
            PROJECT_ID,
            b"digest",
            DEVICE_NAME,
            Some(&session),
            &pin_provider,
        )
        .await;
    assert!(matches!(first, Err(SigningError::InvalidSigningSession)));

    let second = signer
        .sign(
            "erin@example.com",
            PROJECT_ID,
            b"digest",
            DEVICE_NAME,
            Some(&session),
            &pin_provider,
        )
        .await
        .unwrap();
    assert_eq!(second.hash, hex::encode(b"digest"));
}

/// S6 App-link extraction: a fragment-bearing link yields the access id;
/// a fragment-less one fails without any network activity.
#[test]
fn s6_app_link_extraction() {
    assert_eq!(
        Authenticator::extract_access_id_from_app_link("https://x.example/auth#ACC").unwrap(),
        "ACC"
    );
    assert!(matches!(
        Authenticator::extract_access_id_from_app_link("https://x.example/auth"),
        Err(AuthenticationError::InvalidAppLink)
    ));
    assert!(matches!(
        SessionCoordinator::session_id_from_app_link("https://x.example/auth"),
        Err(mpin_coreclient::session_coordinator::SessionError::InvalidAppLink)
    ));
}

/// PIN guard (§8 property 6): a PIN whose length does not match the
/// record rejects before any crypto or HTTP activity.
#[tokio::test]
async fn pin_length_mismatch_rejects_before_any_request() {
    let server = server().await;
    // No mocks: a request here would be a test bug, not a passing result.
    let api_client = ApiClient::new(server.uri()).unwrap();
    let crypto = MockCryptoProvider::new();
    let store = SqliteUserStore::connect_in_memory().await.unwrap();
    let pin_provider = pin("12");
    let user = usable_record("fiona@example.com");

    let result = Authenticator::new(&api_client, &crypto, &store)
        .authenticate(&user, DEVICE_NAME, None, Scope::Jwt, &pin_provider)
        .await;

    assert!(matches!(
        result,
        Err(AuthenticationError::InvalidPin { expected: 4 })
    ));
}
