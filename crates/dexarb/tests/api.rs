//! Drives the HTTP router in-process against an in-memory pool reader and a
//! scripted generator.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dexarb::agents::test_support::{ScriptedGenerator, VALID_REPLY};
use dexarb::agents::TextGenerator;
use dexarb::chain::MemoryPoolReader;
use dexarb::models::config::DexArbConfig;
use dexarb::models::pool::{RawPoolState, TokenInfo};
use dexarb::{router, ArbService};
use serde_json::Value;
use tower::ServiceExt;

const ONE_WETH: u128 = 1_000_000_000_000_000_000;

fn pool(address: &str, usdc: u128, weth: u128) -> RawPoolState {
    RawPoolState {
        pool_address: address.to_string(),
        reserve0: usdc,
        reserve1: weth,
        token0: TokenInfo::new("USDC", 6),
        token1: TokenInfo::new("WETH", 18),
    }
}

/// Uniswap at 2010 USDC/WETH, Sushiswap at 2000.
fn reader(config: &DexArbConfig) -> MemoryPoolReader {
    MemoryPoolReader::new()
        .with_pool(pool(&config.pools.a.address, 2_010_000_000_000, 1_000 * ONE_WETH))
        .with_pool(pool(&config.pools.b.address, 2_000_000_000_000, 1_000 * ONE_WETH))
}

fn app_with(reader: MemoryPoolReader, generator: Arc<dyn TextGenerator>) -> Router {
    let config = DexArbConfig::default();
    router(Arc::new(ArbService::from_config(&config, Arc::new(reader), generator)))
}

fn app(generator: Arc<dyn TextGenerator>) -> Router {
    app_with(reader(&DexArbConfig::default()), generator)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_ai(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/ai")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn banner() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(Arc::new(ScriptedGenerator::failing())), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("dexarb"));
}

#[tokio::test]
async fn health_names_generator() {
    let (status, body) = get_json(app(Arc::new(ScriptedGenerator::failing())), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["generator"], "scripted");
}

#[tokio::test]
async fn prices_report_both_pools() {
    let (status, body) = get_json(app(Arc::new(ScriptedGenerator::failing())), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pool_a"]["venue"], "Uniswap");
    assert_eq!(body["pool_a"]["price"], "2010");
    assert_eq!(body["pool_b"]["price"], "2000");
    assert_eq!(body["spread"], "0.50%");
    assert_eq!(body["signal"]["buy_side"], "Sushiswap");
    assert_eq!(body["signal"]["has_opportunity"], false);
}

#[tokio::test]
async fn arbitrage_without_generator_uses_fallback() {
    let (status, body) =
        get_json(app(Arc::new(ScriptedGenerator::failing())), "/arbitrage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spread"], "0.50%");
    assert_eq!(body["advice"]["decision"], "No Trade Recommended");
    assert_eq!(body["advice_source"]["kind"], "fallback");
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn arbitrage_with_generator_reports_attempt() {
    let (status, body) =
        get_json(app(Arc::new(ScriptedGenerator::always(VALID_REPLY))), "/arbitrage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["advice"]["decision"], "Execute Arbitrage");
    assert_eq!(body["advice"]["riskAnalysis"], "Gas and slippage");
    assert_eq!(body["advice_source"]["kind"], "generator");
    assert_eq!(body["advice_source"]["attempt"], 1);
}

#[tokio::test]
async fn unreadable_pool_is_500_with_error_body() {
    let app = app_with(
        MemoryPoolReader::new(),
        Arc::new(ScriptedGenerator::failing()),
    );
    let (status, body) = get_json(app, "/prices").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Uniswap"));
}

#[tokio::test]
async fn ai_answers_question_with_fresh_quotes() {
    let generator = Arc::new(ScriptedGenerator::always(VALID_REPLY));
    let (status, body) = post_ai(
        app(generator.clone()),
        r#"{"question": "Is it worth the gas?"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["decision"], "Execute Arbitrage");
    assert_eq!(body["source"]["kind"], "generator");
    assert!(generator.prompts()[0].contains("Is it worth the gas?"));
    assert!(generator.prompts()[0].contains("Uniswap=2010.00"));
}

#[tokio::test]
async fn ai_uses_supplied_context() {
    let generator = Arc::new(ScriptedGenerator::always(VALID_REPLY));
    let context = r#"{
        "question": "And now?",
        "context": {
            "pool_a": {"venue": "Uniswap", "pool_address": "0xa",
                "base_token": {"symbol": "WETH", "decimals": 18},
                "quote_token": {"symbol": "USDC", "decimals": 6},
                "reserves": ["1", "1"], "price": "2050"},
            "pool_b": {"venue": "Sushiswap", "pool_address": "0xb",
                "base_token": {"symbol": "WETH", "decimals": 18},
                "quote_token": {"symbol": "USDC", "decimals": 6},
                "reserves": ["1", "1"], "price": "2000"}
        }
    }"#;
    let (status, _) = post_ai(app_with(MemoryPoolReader::new(), generator.clone()), context).await;
    assert_eq!(status, StatusCode::OK);
    assert!(generator.prompts()[0].contains("Spread=2.50%"));
}

#[tokio::test]
async fn ai_falls_back_when_generator_fails() {
    let (status, body) = post_ai(
        app(Arc::new(ScriptedGenerator::failing())),
        r#"{"question": "Trade?"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"]["kind"], "fallback");
    assert_eq!(body["response"]["decision"], "No Trade Recommended");
}

#[tokio::test]
async fn ai_requires_a_question() {
    for body in [r#"{}"#, r#"{"question": ""}"#, r#"{"question": "   "}"#] {
        let (status, json) = post_ai(app(Arc::new(ScriptedGenerator::failing())), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"], "Missing 'question' field");
    }
}

#[tokio::test]
async fn ai_rejects_malformed_json() {
    let (status, body) = post_ai(app(Arc::new(ScriptedGenerator::failing())), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

fn context_body(price_a: &str, price_b: &str) -> String {
    let pool = |venue: &str, address: &str, price: &str| {
        serde_json::json!({
            "venue": venue,
            "pool_address": address,
            "base_token": {"symbol": "WETH", "decimals": 18},
            "quote_token": {"symbol": "USDC", "decimals": 6},
            "reserves": ["1", "1"],
            "price": price,
        })
    };
    serde_json::json!({
        "question": "?",
        "context": {
            "pool_a": pool("Uniswap", "0xa", price_a),
            "pool_b": pool("Sushiswap", "0xb", price_b),
        }
    })
    .to_string()
}

#[tokio::test]
async fn ai_rejects_zero_priced_context() {
    for (a, b) in [("2000", "0"), ("0", "2000"), ("-5", "2000"), ("2000", "-1")] {
        let generator = Arc::new(ScriptedGenerator::always(VALID_REPLY));
        let (status, body) = post_ai(app(generator.clone()), &context_body(a, b)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "a={a} b={b}");
        assert!(body["error"].as_str().unwrap().contains("context"));
        assert_eq!(generator.calls(), 0);
    }
}
