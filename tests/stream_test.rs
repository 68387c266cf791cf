//! Integration tests for the `/video/:id` route.

mod common;

use common::{pattern, TestHarness, MIB};
use reelstream::config::{Config, MalformedRangePolicy};

#[tokio::test]
async fn full_file_without_range() {
    let (h, addr) = TestHarness::with_server().await;
    let data = pattern(1024);
    h.add_video("1", "clip", &data);

    let resp = reqwest::get(format!("http://{addr}/video/1")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "video/mp4");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");
    assert_eq!(resp.headers()["content-length"], "1024");
    assert!(resp.headers().get("content-range").is_none());

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), data.as_slice());
}

#[tokio::test]
async fn closed_range_request() {
    let (h, addr) = TestHarness::with_server().await;
    let data = pattern(2048);
    h.add_video("1", "range_test", &data);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/1"))
        .header("Range", "bytes=100-199")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 100-199/2048");
    assert_eq!(resp.headers()["content-length"], "100");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &data[100..200]);
}

#[tokio::test]
async fn open_range_on_large_file_is_capped_to_one_chunk() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_sized_video("big", "big", 25 * MIB);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/big"))
        .header("Range", "bytes=0-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 0-10485759/26214400");
    assert_eq!(resp.headers()["content-length"], "10485760");
    assert_eq!(resp.bytes().await.unwrap().len(), 10_485_760);
}

#[tokio::test]
async fn open_range_on_small_file_returns_remainder() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_sized_video("small", "small", 5 * MIB);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/small"))
        .header("Range", "bytes=0-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 0-5242879/5242880");
    assert_eq!(resp.headers()["content-length"], "5242880");
    assert_eq!(resp.bytes().await.unwrap().len(), 5_242_880);
}

#[tokio::test]
async fn explicit_oversized_range_is_capped() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_sized_video("big", "big", 25 * MIB);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/big"))
        .header("Range", format!("bytes={}-{}", MIB, 20 * MIB))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers()["content-range"],
        format!("bytes {}-{}/{}", MIB, MIB + 10 * MIB - 1, 25 * MIB).as_str()
    );
    assert_eq!(resp.bytes().await.unwrap().len() as u64, 10 * MIB);
}

#[tokio::test]
async fn start_at_total_size_is_416() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("1", "clip", &pattern(500));

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/1"))
        .header("Range", "bytes=500-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
    assert_eq!(resp.headers()["content-range"], "bytes */500");
}

#[tokio::test]
async fn suffix_range_serves_tail() {
    let (h, addr) = TestHarness::with_server().await;
    let data = pattern(1000);
    h.add_video("1", "clip", &data);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/1"))
        .header("Range", "bytes=-100")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 900-999/1000");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &data[900..]);
}

#[tokio::test]
async fn malformed_range_falls_back_to_full_file() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("1", "clip", &pattern(300));

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/1"))
        .header("Range", "bytes=abc-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().len(), 300);
}

#[tokio::test]
async fn malformed_range_rejected_when_configured() {
    let mut config = Config::default();
    config.streaming.malformed_range = MalformedRangePolicy::Reject;
    let (h, addr) = TestHarness::with_server_config(config).await;
    h.add_video("1", "clip", &pattern(300));

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/1"))
        .header("Range", "bytes=abc-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
    assert_eq!(resp.headers()["content-range"], "bytes */300");
}

#[tokio::test]
async fn unknown_id_is_404_and_not_cached() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/video/999")).await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(h.store_queries(), 1);
    assert!(h.ctx.catalog.cache().is_empty());

    // Not cached, so a repeat lookup reaches the store again
    let resp = reqwest::get(format!("http://{addr}/video/999")).await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(h.store_queries(), 2);
}

#[tokio::test]
async fn invalid_id_is_404_without_store_lookup() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/video/bad%20id")).await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(h.store_queries(), 0);
}

#[tokio::test]
async fn missing_file_is_500() {
    let (h, addr) = TestHarness::with_server().await;
    h.register("ghost", "ghost", Some(10));

    let resp = reqwest::get(format!("http://{addr}/video/ghost")).await.unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn store_queried_once_per_id() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("1", "clip", &pattern(4096));
    let client = reqwest::Client::new();

    for range in ["bytes=0-", "bytes=100-200", "bytes=4000-"] {
        let resp = client
            .get(format!("http://{addr}/video/1"))
            .header("Range", range)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 206);
    }
    let resp = client.get(format!("http://{addr}/video/1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(h.store_queries(), 1);
}

#[tokio::test]
async fn concurrent_first_requests_share_one_lookup() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("hot", "hot", &pattern(2048));
    let client = reqwest::Client::new();

    let requests = (0..16).map(|_| {
        let client = client.clone();
        async move {
            client
                .get(format!("http://{addr}/video/hot"))
                .header("Range", "bytes=0-1023")
                .send()
                .await
                .unwrap()
                .status()
        }
    });
    let statuses = futures::future::join_all(requests).await;

    assert!(statuses.iter().all(|s| *s == 206));
    assert_eq!(h.store_queries(), 1);
}

#[tokio::test]
async fn repeated_range_requests_are_byte_identical() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("1", "clip", &pattern(10_000));
    let client = reqwest::Client::new();

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let body = client
            .get(format!("http://{addr}/video/1"))
            .header("Range", "bytes=1234-5678")
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        bodies.push(body);
    }

    assert_eq!(bodies[0].len(), 5678 - 1234 + 1);
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn sequential_chunks_reassemble_file() {
    let mut config = Config::default();
    config.streaming.chunk_size = 1000;
    let (h, addr) = TestHarness::with_server_config(config).await;
    let data = pattern(3500);
    h.add_video("1", "clip", &data);
    let client = reqwest::Client::new();

    let mut assembled = Vec::new();
    while assembled.len() < data.len() {
        let resp = client
            .get(format!("http://{addr}/video/1"))
            .header("Range", format!("bytes={}-", assembled.len()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 206);
        let chunk = resp.bytes().await.unwrap();
        assert!(chunk.len() <= 1000);
        assembled.extend_from_slice(&chunk);
    }

    assert_eq!(assembled, data);
}

#[tokio::test]
async fn empty_file_full_and_range() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("empty", "empty", &[]);
    let client = reqwest::Client::new();

    let resp = client.get(format!("http://{addr}/video/empty")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-length"], "0");

    let resp = client
        .get(format!("http://{addr}/video/empty"))
        .header("Range", "bytes=0-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
    assert_eq!(resp.headers()["content-range"], "bytes */0");
}

#[tokio::test]
async fn head_request_returns_headers_only() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_video("1", "clip", &pattern(777));

    let resp = reqwest::Client::new()
        .head(format!("http://{addr}/video/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-length"], "777");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");
}

#[tokio::test]
async fn health_endpoint() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
}
