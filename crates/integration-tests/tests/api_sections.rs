//! Integration tests for section browsing and creation.
//!
//! Most tests run against the bundled catalog, which is stored in this order:
//!
//! | # | Name | Category | Price |
//! |---|---|---|---|
//! | 1 | Hero Banner Pro | Hero Banners | 12.99 |
//! | 2 | Customer Reviews Widget | Testimonials | free |
//! | 3 | Product Showcase Grid | Product Features | 8.99 |
//! | 4 | FAQ Accordion | FAQ Sections | 5.99 |
//! | 5 | Image Gallery Masonry | Image Galleries | 9.99 |
//! | 6 | Newsletter Signup Form | Newsletter Signup | free |

use axum::http::StatusCode;
use serde_json::json;

use section_factory_integration_tests::{TestApp, names, section};

const CATALOG: [&str; 6] = [
    "Hero Banner Pro",
    "Customer Reviews Widget",
    "Product Showcase Grid",
    "FAQ Accordion",
    "Image Gallery Masonry",
    "Newsletter Signup Form",
];

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_returns_catalog_in_creation_order() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/sections").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), CATALOG);
}

#[tokio::test]
async fn test_section_json_shape() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/sections?limit=1").await;
    let hero = &body[0];

    assert_eq!(hero["name"], "Hero Banner Pro");
    assert_eq!(hero["category"], "Hero Banners");
    assert_eq!(hero["price"], "12.99");
    assert_eq!(hero["isFree"], false);
    assert_eq!(hero["isPopular"], true);
    assert_eq!(hero["downloads"], 1250);
    assert_eq!(hero["rating"], "4.8");
    assert!(hero["previewImage"].as_str().unwrap().starts_with("https://"));
    assert!(hero["liquidCode"].as_str().unwrap().contains("{% schema %}"));
    assert!(hero["settingsSchema"].is_null());
    assert!(hero["id"].is_string());
    assert!(hero["createdAt"].is_string());
}

#[tokio::test]
async fn test_empty_catalog_lists_nothing() {
    let app = TestApp::empty();
    let (status, body) = app.get("/sections").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Price Buckets
// =============================================================================

#[tokio::test]
async fn test_free_only() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/sections?price_filter=Free%20Only").await;

    assert_eq!(
        names(&body),
        ["Customer Reviews Widget", "Newsletter Signup Form"]
    );
}

#[tokio::test]
async fn test_five_to_fifteen() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/sections?price_filter=%245%20-%20%2415").await;

    assert_eq!(
        names(&body),
        [
            "Hero Banner Pro",
            "Product Showcase Grid",
            "FAQ Accordion",
            "Image Gallery Masonry"
        ]
    );
}

#[tokio::test]
async fn test_empty_buckets() {
    let app = TestApp::seeded().await;

    let (_, body) = app.get("/sections?price_filter=Under%20%245").await;
    assert!(names(&body).is_empty());

    let (_, body) = app.get("/sections?price_filter=Over%20%2425").await;
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_bucket_boundaries() {
    let app = TestApp::with_sections(vec![
        section("p499", "Hero Banners", "4.99", false),
        section("p500", "Hero Banners", "5.00", false),
        section("p1500", "Hero Banners", "15.00", false),
        section("p1501", "Hero Banners", "15.01", false),
        section("p2500", "Hero Banners", "25.00", false),
        section("p2501", "Hero Banners", "25.01", false),
        section("free", "Hero Banners", "0", true),
    ])
    .await;

    let cases = [
        ("Under%20%245", vec!["p499"]),
        ("%245%20-%20%2415", vec!["p500", "p1500"]),
        ("%2415%20-%20%2425", vec!["p1501", "p2500"]),
        ("Over%20%2425", vec!["p2501"]),
        ("Free%20Only", vec!["free"]),
        ("All%20Prices", vec!["p499", "p500", "p1500", "p1501", "p2500", "p2501", "free"]),
    ];

    for (label, expected) in cases {
        let (status, body) = app.get(&format!("/sections?price_filter={label}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), expected, "bucket {label}");
    }
}

#[tokio::test]
async fn test_unknown_bucket_fails_open() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/sections?price_filter=Bargain%20Bin").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), CATALOG);
}

#[tokio::test]
async fn test_is_free_flag() {
    let app = TestApp::seeded().await;

    let (_, body) = app.get("/sections?is_free=false").await;
    assert_eq!(
        names(&body),
        [
            "Hero Banner Pro",
            "Product Showcase Grid",
            "FAQ Accordion",
            "Image Gallery Masonry"
        ]
    );

    let (_, body) = app
        .get("/sections?is_free=true&price_filter=Over%20%2425")
        .await;
    assert_eq!(
        names(&body),
        ["Customer Reviews Widget", "Newsletter Signup Form"]
    );
}

// =============================================================================
// Search and Category
// =============================================================================

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let app = TestApp::seeded().await;

    for term in ["hero", "BANNER", "o%20Pro", "r%20Pro"] {
        let (_, body) = app.get(&format!("/sections?search={term}")).await;
        assert_eq!(names(&body), ["Hero Banner Pro"], "search {term}");
    }
}

#[tokio::test]
async fn test_search_matches_description() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/sections?search=lightbox").await;

    assert_eq!(names(&body), ["Image Gallery Masonry"]);
}

#[tokio::test]
async fn test_blank_search_is_ignored() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/sections?search=%20%20").await;

    assert_eq!(names(&body), CATALOG);
}

#[tokio::test]
async fn test_category_filter() {
    let app = TestApp::seeded().await;

    let (_, body) = app.get("/sections?category=Testimonials").await;
    assert_eq!(names(&body), ["Customer Reviews Widget"]);

    let (_, body) = app.get("/sections?category=testimonials").await;
    assert!(names(&body).is_empty());

    let (_, body) = app.get("/sections?category=All%20Categories").await;
    assert_eq!(names(&body), CATALOG);
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let app = TestApp::seeded().await;

    let (_, body) = app
        .get("/sections?category=Hero%20Banners&price_filter=Free%20Only")
        .await;
    assert!(names(&body).is_empty());

    let (_, body) = app
        .get("/sections?search=form&price_filter=Free%20Only&category=Newsletter%20Signup")
        .await;
    assert_eq!(names(&body), ["Newsletter Signup Form"]);
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_second_page_of_two() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/sections?page=2&limit=2").await;

    assert_eq!(names(&body), ["Product Showcase Grid", "FAQ Accordion"]);
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/sections?page=9&limit=5").await;

    assert_eq!(status, StatusCode::OK);
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_invalid_paging_uses_defaults() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/sections?page=0&limit=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), CATALOG);
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let app = TestApp::seeded().await;
    let uri = "/sections?search=e&price_filter=%245%20-%20%2415&limit=3";

    let (_, first) = app.get(uri).await;
    let (_, second) = app.get(uri).await;
    assert_eq!(first, second);
}

// =============================================================================
// Show
// =============================================================================

#[tokio::test]
async fn test_show_section() {
    let app = TestApp::seeded().await;
    let id = app.section_id("FAQ Accordion").await;

    let (status, body) = app.get(&format!("/sections/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "FAQ Accordion");
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn test_show_missing_section() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .get(&format!("/sections/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Section not found");

    let (status, _) = app.get("/sections/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_section() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post_json(
            "/sections",
            &json!({
                "name": "Countdown Clock",
                "description": "Urgency timer for launches",
                "category": "Countdown Timers",
                "price": "3.5",
                "previewImage": "https://images.example.com/countdown.png",
                "liquidCode": "<div class=\"countdown\"></div>",
                "downloads": 9000,
                "rating": "5.0"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Countdown Clock");
    assert_eq!(body["price"], "3.50");
    assert_eq!(body["isFree"], false);
    assert_eq!(body["isPopular"], false);
    assert_eq!(body["downloads"], 0);
    assert!(body["rating"].is_null());

    let (_, listed) = app.get("/sections").await;
    let listed = names(&listed);
    assert_eq!(listed.len(), 7);
    assert_eq!(listed.last().map(String::as_str), Some("Countdown Clock"));

    let (status, shown) = app
        .get(&format!("/sections/{}", body["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown, body);
}

#[tokio::test]
async fn test_create_accepts_numeric_price() {
    let app = TestApp::empty();
    let (status, body) = app
        .post_json(
            "/sections",
            &json!({
                "name": "Contact Card",
                "description": "Simple contact form",
                "category": "Contact Forms",
                "price": 0,
                "isFree": true,
                "previewImage": "/previews/contact.png",
                "liquidCode": "<form></form>"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], "0.00");
    assert_eq!(body["isFree"], true);
}

#[tokio::test]
async fn test_create_reports_every_invalid_field() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post_json(
            "/sections",
            &json!({
                "name": "   ",
                "category": "Hero Banners",
                "price": "-1",
                "previewImage": "hero.png",
                "liquidCode": "<div></div>"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid section data");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["name", "description", "previewImage", "price"]);

    let (_, listed) = app.get("/sections").await;
    assert_eq!(names(&listed).len(), 6);
}

#[tokio::test]
async fn test_create_free_section_with_price_rejected() {
    let app = TestApp::empty();
    let (status, body) = app
        .post_json(
            "/sections",
            &json!({
                "name": "Not Really Free",
                "description": "Mismatched flags",
                "category": "Social Proof",
                "price": "4.00",
                "isFree": true,
                "previewImage": "/p.png",
                "liquidCode": "<div></div>"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "price");
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = TestApp::empty();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/sections")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = section_factory_integration_tests::json_body(response).await;
    assert!(body["error"].is_string());
}
