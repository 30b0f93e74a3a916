use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_core::{IpInfoClient, UpstreamWeatherClient, WeatherFacade};
use weather_server::{AppState, routes};

const TOKEN: &str = "test-token";

fn app(weather: &MockServer, geo: &MockServer) -> Router {
    let upstream =
        UpstreamWeatherClient::new(weather.uri(), "KEY").expect("upstream client must build");
    let geo_client = IpInfoClient::new(geo.uri()).expect("geo client must build");
    let facade = WeatherFacade::new(Box::new(geo_client), upstream);

    let state = AppState {
        facade: Arc::new(facade),
        auth_token: TOKEN.to_string(),
    };

    routes::router(state).layer(MockConnectInfo(SocketAddr::from(([192, 0, 2, 1], 40000))))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .expect("request must build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body must collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be JSON")
}

fn current_payload() -> Value {
    json!({
        "sys": {"country": "US"},
        "name": "New York",
        "main": {"temp": 14.21},
        "weather": [{"description": "clear sky"}],
    })
}

#[tokio::test]
async fn weather_routes_reject_missing_credentials() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    for uri in [
        "/weather/current/",
        "/weather/current_forecast/",
        "/weather/search/?query=London",
        "/weather/forecast/?query=London",
    ] {
        let response = app(&weather, &geo)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
        let body = body_json(response).await;
        assert_eq!(
            body["detail"],
            "Authentication credentials were not provided."
        );
    }
}

#[tokio::test]
async fn weather_routes_reject_wrong_token() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    let request = Request::builder()
        .uri("/weather/search/?query=London")
        .header("authorization", "Bearer wrong")
        .body(Body::empty())
        .unwrap();

    let response = app(&weather, &geo).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["detail"], "Invalid token.");
}

#[tokio::test]
async fn healthz_is_open() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    let response = app(&weather, &geo)
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_returns_current_weather() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "New York"))
        .and(query_param("zip", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_payload()))
        .expect(1)
        .mount(&weather)
        .await;

    let response = app(&weather, &geo)
        .oneshot(get("/weather/search/?query=New%20York"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let current = &body["current_weather_data"];
    assert_eq!(current["city"], "New York");
    assert_eq!(current["country"], "US");
    assert_eq!(current["temperature"], 14.21);
    assert_eq!(current["description"], "clear sky");
}

#[tokio::test]
async fn search_without_query_is_bad_request_and_calls_nothing() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&weather)
        .await;

    let response = app(&weather, &geo)
        .oneshot(get("/weather/search/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["detail"],
        "Please provide a city name or zip code"
    );
}

#[tokio::test]
async fn search_upstream_failure_maps_to_error_body() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
        .mount(&weather)
        .await;

    let response = app(&weather, &geo)
        .oneshot(get("/weather/search/?query=Nowhere"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error must be a string");
    assert!(message.starts_with("Check that the entered data is correct:"));
}

#[tokio::test]
async fn forecast_returns_seven_day_window() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    let tomorrow = (chrono_now_date() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": {"name": "London", "country": "GB"},
            "list": [
                {
                    "dt_txt": format!("{tomorrow} 12:00:00"),
                    "main": {"temp": 8.0},
                    "weather": [{"description": "scattered clouds"}],
                },
            ],
        })))
        .expect(1)
        .mount(&weather)
        .await;

    let response = app(&weather, &geo)
        .oneshot(get("/weather/forecast/?query=London"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let window = body["next_7_days_forecast"]
        .as_array()
        .expect("forecast must be a list");
    assert_eq!(window.len(), 1);
    assert_eq!(window[0]["city"], "London");
    assert_eq!(window[0]["time"], "12:00");
}

#[tokio::test]
async fn current_geolocates_forwarded_client_address() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/203.0.113.7/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "203.0.113.7",
            "loc": "40.7128,-74.006",
        })))
        .expect(1)
        .mount(&geo)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "40.7128"))
        .and(query_param("lon", "-74.006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_payload()))
        .expect(1)
        .mount(&weather)
        .await;

    let mut request = get("/weather/current/");
    request
        .headers_mut()
        .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

    let response = app(&weather, &geo).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["current_weather_data"]["city"], "New York");
}

#[tokio::test]
async fn unresolvable_location_is_reported_without_weather_calls() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/192.0.2.1/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "192.0.2.1",
            "bogon": true,
        })))
        .mount(&geo)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&weather)
        .await;

    let response = app(&weather, &geo)
        .oneshot(get("/weather/current/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["detail"],
        "Unable to determine user location."
    );
}

#[tokio::test]
async fn combined_returns_current_and_forecast() {
    let weather = MockServer::start().await;
    let geo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/192.0.2.1/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "192.0.2.1",
            "loc": "40.7128,-74.006",
        })))
        .mount(&geo)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_payload()))
        .expect(1)
        .mount(&weather)
        .await;

    let tomorrow = (chrono_now_date() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": {"name": "New York", "country": "US"},
            "list": [
                {
                    "dt_txt": format!("{tomorrow} 15:00:00"),
                    "main": {"temp": 11.0},
                    "weather": [{"description": "few clouds"}],
                },
            ],
        })))
        .expect(1)
        .mount(&weather)
        .await;

    let response = app(&weather, &geo)
        .oneshot(get("/weather/current_forecast/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["current_weather_data"]["city"], "New York");
    let window = body["next_7_days_forecast"]
        .as_array()
        .expect("forecast must be a list");
    assert_eq!(window.len(), 1);
    assert_eq!(window[0]["description"], "few clouds");
}

fn chrono_now_date() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
