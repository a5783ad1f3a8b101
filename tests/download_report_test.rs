use httpmock::prelude::*;
use shop_download_stats::{download_report, ReportError, ShopConfig};

// 兩個情境共用環境變數，放在同一個測試裡依序執行
#[tokio::test]
async fn test_download_report_reads_environment() {
    std::env::remove_var("SHOPIFY_ACCESS_TOKEN");
    std::env::remove_var("SHOPIFY_STORE");

    // 直接讀環境變數，不經過 .env 載入
    let missing = ShopConfig::from_env();
    assert!(matches!(
        missing,
        Err(ReportError::MissingConfigError { .. })
    ));

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/admin/api/2023-10/products.json")
            .header("x-shopify-access-token", "shpat_env");
        then.status(200).json_body(serde_json::json!({
            "products": [{"id": 5, "title": "Rayuela"}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/admin/api/2023-10/products/5/metafields.json");
        then.status(200).json_body(serde_json::json!({
            "metafields": [{"namespace": "custom", "key": "download_count", "value": 17}]
        }));
    });

    std::env::set_var("SHOPIFY_STORE", server.base_url());
    std::env::set_var("SHOPIFY_ACCESS_TOKEN", "shpat_env");

    let rows = download_report().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Rayuela");
    assert_eq!(rows[0].downloads, "17");

    std::env::remove_var("SHOPIFY_STORE");
    std::env::remove_var("SHOPIFY_ACCESS_TOKEN");
}
