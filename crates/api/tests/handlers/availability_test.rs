use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use slotsync_core::models::availability::{AvailabilityDto, AvailabilitySlot, Interval, NewAvailabilitySlot};

use crate::test_utils::{DAY, TestContext, fixed_day, slot, start_of_today};

const SUBMIT_PATH: &str = "/availability/userSubmitAvailability";
const OVERLAP_PATH: &str = "/availability/userAvailability/getOverlappingAvailability";

async fn get_overlap(
    server: &TestServer,
    user_id1: &str,
    user_id2: &str,
    date: Option<&str>,
) -> TestResponse {
    let request = server.get(&format!("{OVERLAP_PATH}/user1/{user_id1}/userId2/{user_id2}"));
    match date {
        Some(date) => request.add_query_param("date", date).await,
        None => request.await,
    }
}

/// Echoes each new slot back as stored, numbering ids from 1.
fn stored(slots: Vec<NewAvailabilitySlot>) -> eyre::Result<Vec<AvailabilitySlot>> {
    Ok(slots
        .into_iter()
        .zip(1..)
        .map(|(s, id)| AvailabilitySlot {
            id,
            user_id: s.user_id,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
        })
        .collect())
}

fn error_message(response: &TestResponse) -> String {
    let body: serde_json::Value = response.json();
    body["error"].as_str().unwrap_or_default().to_string()
}

// GET /availability/user/{id}

#[tokio::test]
async fn test_get_availability_returns_every_slot() {
    let mut ctx = TestContext::new().with_known_users(&[1]);
    let slots = vec![
        slot(1, 1, 1_700_000_000_000, 1_700_003_600_000, 1_700_007_200_000),
        slot(2, 1, 1_700_000_000_000, 1_700_010_000_000, 1_700_020_000_000),
    ];
    let returned = slots.clone();
    ctx.availability_repo
        .expect_get_user_availability()
        .with(predicate::eq(1))
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let response = ctx.server().get("/availability/user/1").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<AvailabilityDto> = response.json();
    let expected: Vec<AvailabilityDto> = slots.into_iter().map(AvailabilityDto::from).collect();
    assert_eq!(body, expected);
}

#[tokio::test]
async fn test_get_availability_for_user_without_slots_is_empty() {
    let mut ctx = TestContext::new().with_known_users(&[1]);
    ctx.availability_repo
        .expect_get_user_availability()
        .returning(|_| Ok(Vec::new()));

    let response = ctx.server().get("/availability/user/1").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<AvailabilityDto>>(), Vec::new());
}

#[tokio::test]
async fn test_get_availability_unknown_user() {
    let mut ctx = TestContext::new().with_known_users(&[1]);
    ctx.availability_repo.expect_get_user_availability().never();

    let response = ctx.server().get("/availability/user/99").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_get_availability_malformed_id() {
    let mut ctx = TestContext::new();
    ctx.user_repo.expect_get_user_by_id().never();

    let response = ctx.server().get("/availability/user/abc").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(error_message(&response).contains("id"));
}

#[tokio::test]
async fn test_get_availability_store_failure() {
    let mut ctx = TestContext::new().with_known_users(&[1]);
    ctx.availability_repo
        .expect_get_user_availability()
        .returning(|_| Err(eyre::eyre!("connection refused")));

    let response = ctx.server().get("/availability/user/1").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// POST /availability/userSubmitAvailability/{userId}

#[tokio::test]
async fn test_submit_availability_persists_fields_verbatim() {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability().never();
    ctx.availability_repo
        .expect_create_availability_batch()
        .withf(|slots: &Vec<NewAvailabilitySlot>| {
            slots
                == &vec![
                    NewAvailabilitySlot {
                        user_id: 7,
                        date: 1_700_000_000_000,
                        start_time: 1_700_003_600_000,
                        end_time: 1_700_007_200_000,
                    },
                    NewAvailabilitySlot {
                        user_id: 7,
                        date: 1_700_000_000_000,
                        start_time: 1_700_010_000_000,
                        end_time: 1_700_020_000_000,
                    },
                ]
        })
        .times(1)
        .returning(stored);

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/7"))
        .json(&json!({
            "userId": 7,
            "availabilityList": [
                {"date": "1700000000000", "startTime": "1700003600000", "endTime": "1700007200000"},
                {"date": "1700000000000", "startTime": "1700010000000", "endTime": "1700020000000"}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_submit_availability_accepts_numeric_fields() {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo
        .expect_create_availability_batch()
        .withf(|slots: &Vec<NewAvailabilitySlot>| {
            slots
                == &vec![NewAvailabilitySlot {
                    user_id: 7,
                    date: 1_700_000_000_000,
                    start_time: 1_700_003_600_000,
                    end_time: 1_700_007_200_000,
                }]
        })
        .times(1)
        .returning(stored);

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/7"))
        .json(&json!({
            "availabilityList": [
                {"date": 1_700_000_000_000_i64, "startTime": 1_700_003_600_000_i64, "endTime": 1_700_007_200_000_i64}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_submit_availability_unknown_user_writes_nothing() {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability().never();
    ctx.availability_repo.expect_create_availability_batch().never();

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/8"))
        .json(&json!({
            "availabilityList": [
                {"date": 1_700_000_000_000_i64, "startTime": 1_700_003_600_000_i64, "endTime": 1_700_007_200_000_i64}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_submit_availability_unknown_user_checked_before_body() {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability_batch().never();
    let server = ctx.server();

    let garbled = server
        .post(&format!("{SUBMIT_PATH}/8"))
        .json(&json!({"availabilityList": "not a list"}))
        .await;
    assert_eq!(garbled.status_code(), StatusCode::BAD_REQUEST);
    assert!(garbled.text().is_empty());

    let untyped = server.post(&format!("{SUBMIT_PATH}/8")).text("{}").await;
    assert_eq!(untyped.status_code(), StatusCode::BAD_REQUEST);
    assert!(untyped.text().is_empty());
}

#[rstest]
#[case(json!({"availabilityList": "not a list"}))]
#[case(json!({"availabilityList": [{"date": 1.5, "startTime": 1000, "endTime": 2000}]}))]
#[case(json!({"availabilityList": [{"date": true, "startTime": 1000, "endTime": 2000}]}))]
#[case(json!({"availabilityList": [{"startTime": 1000, "endTime": 2000}]}))]
#[tokio::test]
async fn test_submit_availability_undecodable_body_writes_nothing(#[case] body: serde_json::Value) {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability().never();
    ctx.availability_repo.expect_create_availability_batch().never();

    let response = ctx.server().post(&format!("{SUBMIT_PATH}/7")).json(&body).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(error_message(&response).starts_with("Validation error"));
}

#[tokio::test]
async fn test_submit_availability_without_json_content_type() {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability_batch().never();

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/7"))
        .text(r#"{"availabilityList": []}"#)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(error_message(&response).starts_with("Validation error"));
}

#[rstest]
#[case(json!({"date": "soon", "startTime": "1000", "endTime": "2000"}))]
#[case(json!({"date": "0", "startTime": "2000", "endTime": "1000"}))]
#[case(json!({"date": 0, "startTime": 1000, "endTime": 1000}))]
#[tokio::test]
async fn test_submit_availability_invalid_entry_writes_nothing(#[case] bad: serde_json::Value) {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability().never();
    ctx.availability_repo.expect_create_availability_batch().never();

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/7"))
        .json(&json!({
            "availabilityList": [
                {"date": "0", "startTime": "1000", "endTime": "2000"},
                bad
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_availability_mismatched_body_user() {
    let mut ctx = TestContext::new().with_known_users(&[7, 8]);
    ctx.availability_repo.expect_create_availability_batch().never();

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/7"))
        .json(&json!({
            "userId": 8,
            "availabilityList": [{"date": "0", "startTime": "1000", "endTime": "2000"}]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_empty_list_is_accepted_without_writes() {
    let mut ctx = TestContext::new().with_known_users(&[7]);
    ctx.availability_repo.expect_create_availability_batch().never();

    let response = ctx
        .server()
        .post(&format!("{SUBMIT_PATH}/7"))
        .json(&json!({"availabilityList": []}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

// GET .../getOverlappingAvailability/user1/{userId1}/userId2/{userId2}

fn expect_slots(ctx: &mut TestContext, first: Vec<AvailabilitySlot>, second: Vec<AvailabilitySlot>) {
    ctx.availability_repo
        .expect_get_user_availability()
        .with(predicate::eq(1))
        .times(1)
        .returning(move |_| Ok(first.clone()));
    ctx.availability_repo
        .expect_get_user_availability()
        .with(predicate::eq(2))
        .times(1)
        .returning(move |_| Ok(second.clone()));
}

#[tokio::test]
async fn test_overlap_single_interval() {
    let day = fixed_day();
    let mut ctx = TestContext::new().with_known_users(&[1, 2]);
    expect_slots(
        &mut ctx,
        vec![slot(1, 1, day, day + 1000, day + 2000)],
        vec![slot(2, 2, day, day + 1500, day + 2500)],
    );

    let response = get_overlap(&ctx.server(), "1", "2", Some(&(day + 60_000).to_string())).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Vec<Interval>>(),
        vec![Interval::new(day + 1500, day + 2000)]
    );
}

#[tokio::test]
async fn test_overlap_touching_slots_is_empty() {
    let day = fixed_day();
    let mut ctx = TestContext::new().with_known_users(&[1, 2]);
    expect_slots(
        &mut ctx,
        vec![slot(1, 1, day, day + 1000, day + 2000)],
        vec![slot(2, 2, day, day + 2000, day + 3000)],
    );

    let response = get_overlap(&ctx.server(), "1", "2", Some(&day.to_string())).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Interval>>(), Vec::new());
}

#[tokio::test]
async fn test_overlap_ignores_other_days() {
    let day = fixed_day();
    let mut ctx = TestContext::new().with_known_users(&[1, 2]);
    expect_slots(
        &mut ctx,
        vec![slot(1, 1, day - DAY, day - DAY + 1000, day - DAY + 2000)],
        vec![slot(2, 2, day - DAY, day - DAY + 1500, day - DAY + 2500)],
    );

    let response = get_overlap(&ctx.server(), "1", "2", Some(&day.to_string())).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Interval>>(), Vec::new());
}

#[rstest]
#[case(0)]
#[case(1)]
#[tokio::test]
async fn test_overlap_date_selects_day(#[case] days_back: i64) {
    let day = fixed_day();
    let mut ctx = TestContext::new().with_known_users(&[1, 2]);
    expect_slots(
        &mut ctx,
        vec![
            slot(1, 1, day, day + 1000, day + 2000),
            slot(2, 1, day - DAY, day - DAY + 5000, day - DAY + 9000),
        ],
        vec![
            slot(3, 2, day, day + 1500, day + 2500),
            slot(4, 2, day - DAY, day - DAY + 7000, day - DAY + 8000),
        ],
    );
    let reference = day - days_back * DAY + 12 * 3_600_000;

    let response = get_overlap(&ctx.server(), "1", "2", Some(&reference.to_string())).await;

    let expected = if days_back == 0 {
        Interval::new(day + 1500, day + 2000)
    } else {
        Interval::new(day - DAY + 7000, day - DAY + 8000)
    };
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Interval>>(), vec![expected]);
}

#[rstest]
#[case(None)]
#[case(Some("0"))]
#[case(Some("-1"))]
#[tokio::test]
async fn test_overlap_defaults_to_today(#[case] date: Option<&'static str>) {
    let before = start_of_today();
    let mut ctx = TestContext::new().with_known_users(&[1, 2]);
    // Slots on three consecutive days so the check holds across UTC midnight
    let first = [before - DAY, before, before + DAY]
        .into_iter()
        .zip(1..)
        .map(|(day, id)| slot(id, 1, day, day + 1000, day + 2000))
        .collect();
    let second = [before - DAY, before, before + DAY]
        .into_iter()
        .zip(10..)
        .map(|(day, id)| slot(id, 2, day, day + 1500, day + 2500))
        .collect();
    expect_slots(&mut ctx, first, second);

    let response = get_overlap(&ctx.server(), "1", "2", date).await;
    let after = start_of_today();

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Vec<Interval>>();
    let accepted: Vec<Vec<Interval>> = [before, after]
        .iter()
        .map(|day| vec![Interval::new(day + 1500, day + 2000)])
        .collect();
    assert!(accepted.contains(&body), "unexpected overlap: {:?}", body);
}

#[rstest]
#[case("1", "99")]
#[case("99", "2")]
#[tokio::test]
async fn test_overlap_unknown_user_skips_computation(
    #[case] user_id1: &'static str,
    #[case] user_id2: &'static str,
) {
    let mut ctx = TestContext::new().with_known_users(&[1, 2]);
    ctx.availability_repo.expect_get_user_availability().never();

    let response = get_overlap(&ctx.server(), user_id1, user_id2, None).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().is_empty());
}

#[rstest]
#[case("one", "2", None, "userId1")]
#[case("1", "2.5", None, "userId2")]
#[case("1", "2", Some("yesterday"), "date")]
#[case("1", "2", Some("1.5"), "date")]
#[tokio::test]
async fn test_overlap_malformed_input(
    #[case] user_id1: &'static str,
    #[case] user_id2: &'static str,
    #[case] date: Option<&'static str>,
    #[case] field: &'static str,
) {
    let mut ctx = TestContext::new();
    ctx.user_repo.expect_get_user_by_id().never();
    ctx.availability_repo.expect_get_user_availability().never();

    let response = get_overlap(&ctx.server(), user_id1, user_id2, date).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let message = error_message(&response);
    assert!(message.starts_with("Validation error"));
    assert!(message.contains(&format!("{field} must be")), "unexpected message: {message}");
}
