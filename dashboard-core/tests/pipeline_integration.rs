//! End-to-end lookups against mock Nominatim and OpenWeatherMap endpoints.

use dashboard_core::{
    AqiLevel, Condition, Config, FORECAST_LIMIT, Pipeline, ProviderError, Resource, Units,
    WeatherError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "TEST_KEY";

fn config(server: &MockServer) -> Config {
    let mut cfg = Config {
        weather_url: server.uri(),
        geocoder_url: server.uri(),
        timeout_secs: 2,
        ..Config::default()
    };
    cfg.set_api_key(KEY.into());
    cfg
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3522, "lat": 48.8566 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "main": { "temp": 14.3, "feels_like": 13.6, "temp_min": 12.0, "temp_max": 15.1, "pressure": 1018, "humidity": 72 },
        "wind": { "speed": 5.1, "deg": 250 },
        "dt": 1_700_000_000,
        "name": "Paris"
    })
}

fn forecast_body(count: usize) -> serde_json::Value {
    let labels = ["Rain", "Clear", "Snow", "Drizzle", "Mist", "Thunderstorm", "Meteor"];
    let list: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "dt": 1_700_010_800 + i as i64 * 10_800,
                "main": { "temp": 10.0 + i as f64, "feels_like": 9.0, "pressure": 1010, "humidity": 60 },
                "weather": [{ "main": labels[i % labels.len()], "description": format!("slot {i}") }],
                "wind": { "speed": 2.0 }
            })
        })
        .collect();

    serde_json::json!({ "cod": "200", "cnt": count, "list": list, "city": { "name": "Paris", "country": "FR" } })
}

fn air_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3522, "lat": 48.8566 },
        "list": [{
            "dt": 1_700_000_000,
            "main": { "aqi": 3 },
            "components": { "co": 230.3, "no": 0.1, "no2": 21.9, "o3": 40.0, "so2": 1.2, "pm2_5": 15.7, "pm10": 20.1, "nh3": 0.9 }
        }]
    })
}

async fn mount_geocoder(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "lat": "48.8566", "lon": "2.3522",
            "display_name": "Paris, Île-de-France, France métropolitaine, France"
        }])))
        .mount(server)
        .await;
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{endpoint}")))
        .and(query_param("lat", "48.8566"))
        .and(query_param("lon", "2.3522"))
        .and(query_param("appid", KEY))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(forecast_body(40))).await;
    mount(&server, "air_pollution", ResponseTemplate::new(200).set_body_json(air_body())).await;
    server
}

#[tokio::test]
async fn full_lookup_builds_normalized_report() {
    let server = healthy_server().await;
    let pipeline = Pipeline::from_config(&config(&server)).unwrap();

    let report = pipeline.lookup("Paris").await.unwrap();

    assert_eq!(
        report.place.address.as_deref(),
        Some("Paris, Île-de-France, France métropolitaine, France")
    );
    assert_eq!(report.units, Units::Metric);

    assert_eq!(report.current.condition, Condition::Clouds);
    assert_eq!(report.current.description, "broken clouds");
    assert_eq!(report.current.temperature, 14.3);
    assert_eq!(report.current.feels_like, 13.6);
    assert_eq!(report.current.humidity_pct, 72);
    assert_eq!(report.current.wind_speed, 5.1);
    assert_eq!(report.current.pressure_hpa, 1018);

    let air = report.air.expect("air quality should be present");
    assert_eq!(air.aqi, AqiLevel::Moderate);
    assert_eq!(air.pm2_5, 15.7);
    assert_eq!(air.no2, 21.9);
}

#[tokio::test]
async fn forty_forecast_entries_become_the_first_five() {
    let server = healthy_server().await;
    let pipeline = Pipeline::from_config(&config(&server)).unwrap();

    let report = pipeline.lookup("Paris").await.unwrap();

    assert_eq!(report.forecast.len(), FORECAST_LIMIT);
    let slots: Vec<&str> = report.forecast.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(slots, vec!["slot 0", "slot 1", "slot 2", "slot 3", "slot 4"]);

    let conditions: Vec<Condition> = report.forecast.iter().map(|e| e.condition).collect();
    assert_eq!(
        conditions,
        vec![
            Condition::Rain,
            Condition::Clear,
            Condition::Snow,
            Condition::Drizzle,
            Condition::Mist
        ]
    );
    assert!(report.forecast.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn bad_entries_after_the_first_five_are_ignored() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "air_pollution", ResponseTemplate::new(200).set_body_json(air_body())).await;

    let mut body = forecast_body(5);
    let list = body["list"].as_array_mut().unwrap();
    list.push(serde_json::json!({
        "dt": 9_000_000_000_000_000_i64,
        "main": { "temp": 1.0 },
        "weather": [{ "main": "Rain", "description": "far future" }]
    }));
    list.push(serde_json::json!({ "dt": "not a number" }));
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(body)).await;

    let report = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Paris")
        .await
        .unwrap();

    assert_eq!(report.forecast.len(), FORECAST_LIMIT);
    assert_eq!(report.forecast[4].description, "slot 4");
}

#[tokio::test]
async fn unknown_forecast_label_maps_to_unknown() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "air_pollution", ResponseTemplate::new(200).set_body_json(air_body())).await;

    let body = serde_json::json!({
        "list": [{ "dt": 1_700_010_800, "main": { "temp": 1.0 }, "weather": [{ "main": "Meteor", "description": "falling rocks" }] }]
    });
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(body)).await;

    let report = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Paris")
        .await
        .unwrap();

    assert_eq!(report.forecast[0].condition, Condition::Unknown);
    assert_eq!(report.forecast[0].condition_label, "Meteor");
}

#[tokio::test]
async fn air_quality_failure_leaves_air_absent() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(forecast_body(8))).await;
    mount(&server, "air_pollution", ResponseTemplate::new(500).set_body_string("boom")).await;

    let report = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Paris")
        .await
        .unwrap();

    assert!(report.air.is_none());
    assert_eq!(report.forecast.len(), FORECAST_LIMIT);
    assert_eq!(report.current.condition, Condition::Clouds);
}

#[tokio::test]
async fn malformed_air_quality_payload_leaves_air_absent() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(forecast_body(3))).await;
    mount(&server, "air_pollution", ResponseTemplate::new(200).set_body_string("<html>")).await;

    let report = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Paris")
        .await
        .unwrap();

    assert!(report.air.is_none());
    assert_eq!(report.forecast.len(), 3);
}

#[tokio::test]
async fn current_failure_fails_the_lookup() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(401).set_body_json(serde_json::json!({
        "cod": 401, "message": "Invalid API key"
    })))
    .await;
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(forecast_body(5))).await;
    mount(&server, "air_pollution", ResponseTemplate::new(200).set_body_json(air_body())).await;

    let err = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Paris")
        .await
        .unwrap_err();

    assert!(!err.is_retryable());
    match err {
        WeatherError::WeatherFetchFailed {
            resource: Resource::Current,
            cause: ProviderError::Status { status, body },
        } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected current fetch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_failure_fails_the_lookup() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "forecast", ResponseTemplate::new(502).set_body_string("bad gateway")).await;
    mount(&server, "air_pollution", ResponseTemplate::new(200).set_body_json(air_body())).await;

    let err = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Paris")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherError::WeatherFetchFailed {
            resource: Resource::Forecast,
            ..
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unknown_city_skips_weather_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = Pipeline::from_config(&config(&server))
        .unwrap()
        .lookup("Xyzzyville")
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::PlaceNotFound { .. }));
}

#[tokio::test]
async fn imperial_units_are_forwarded() {
    let server = MockServer::start().await;
    mount_geocoder(&server).await;

    for (endpoint, body) in [
        ("weather", current_body()),
        ("forecast", forecast_body(5)),
        ("air_pollution", air_body()),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/{endpoint}")))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let report = Pipeline::from_config(&config(&server))
        .unwrap()
        .with_units(Units::Imperial)
        .lookup("Paris")
        .await
        .unwrap();

    assert_eq!(report.units, Units::Imperial);
    assert!(report.air.is_some());
}

#[tokio::test]
async fn identical_payloads_give_equal_reports() {
    let server = healthy_server().await;
    let pipeline = Pipeline::from_config(&config(&server)).unwrap();

    let first = pipeline.lookup("Paris").await.unwrap();
    let second = pipeline.lookup("Paris").await.unwrap();

    assert_eq!(first, second);
}

#[test]
fn missing_api_key_is_rejected_before_any_query() {
    let err = Pipeline::from_config(&Config::default()).unwrap_err();
    assert!(err.to_string().contains("No OpenWeatherMap API key configured"));
}
