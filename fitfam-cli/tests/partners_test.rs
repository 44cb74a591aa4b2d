use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ME: &str = "0f6e3a57-1d0c-4a57-bb5c-7c3e2f7ad001";
const ALEX: &str = "0f6e3a57-1d0c-4a57-bb5c-7c3e2f7ad002";
const BEA: &str = "0f6e3a57-1d0c-4a57-bb5c-7c3e2f7ad003";
const INVITE: &str = "6b1d9f3e-9a51-4f0e-8d1c-2e5c7a9b0c01";

fn signed_in(server: &mut Server, dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            "[backend]\nurl = \"{}\"\nanon_key = \"anon-key\"\n\n[auth]\naccess_token = \"access-token\"\nrefresh_token = \"refresh-token\"\n",
            server.url()
        ),
    )
    .unwrap();

    server
        .mock("GET", "/auth/v1/user")
        .with_header("content-type", "application/json")
        .with_body(json!({"id": ME}).to_string())
        .create();
    path
}

fn fitfam(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("fitfam").unwrap();
    cmd.arg("--config")
        .arg(config)
        .env_remove("FITFAM_URL")
        .env_remove("FITFAM_ANON_KEY")
        .env("NO_COLOR", "1");
    cmd
}

fn person(id: &str, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "username": name.to_lowercase()})
}

#[test]
fn test_list_renders_received_invite_with_actions() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let config = signed_in(&mut server, &dir);

    let _rows = server
        .mock("GET", "/rest/v1/workout_partners")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": INVITE,
                "status": "pending",
                "created_at": "2024-03-09T12:00:00+00:00",
                "is_favorite": null,
                "user": person(ALEX, "Alex"),
                "partner": person(ME, "Me")
            }, {
                "id": "6b1d9f3e-9a51-4f0e-8d1c-2e5c7a9b0c02",
                "status": "rejected",
                "created_at": "2024-03-01T12:00:00+00:00",
                "is_favorite": false,
                "user": person(ME, "Me"),
                "partner": person(BEA, "Bea")
            }])
            .to_string(),
        )
        .create();

    fitfam(&config)
        .args(["partners", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Received Invites"))
        .stdout(predicate::str::contains("Alex  @alex  Pending"))
        .stdout(predicate::str::contains(format!("fitfam partners accept {}", INVITE)))
        .stdout(predicate::str::contains("Partner Stats Coming Soon!"))
        .stdout(predicate::str::contains("Bea  @bea  Invite rejected"))
        .stdout(predicate::str::contains("0 partner(s), 1 pending invite(s)"));
}

#[test]
fn test_list_falls_back_when_partner_stats_fail() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let config = signed_in(&mut server, &dir);

    let _rows = server
        .mock("GET", "/rest/v1/workout_partners")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": INVITE,
                "status": "accepted",
                "created_at": "2024-03-09T12:00:00+00:00",
                "is_favorite": false,
                "user": person(ME, "Me"),
                "partner": person(BEA, "Bea")
            }])
            .to_string(),
        )
        .create();
    let lookup = server
        .mock("GET", "/rest/v1/users")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{}", BEA)))
        .with_status(406)
        .with_body(r#"{"message": "JSON object requested, multiple (or no) rows returned"}"#)
        .expect(1)
        .create();

    fitfam(&config)
        .args(["partners", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent Invites"))
        .stdout(predicate::str::contains("Bea  @bea\n"))
        .stdout(predicate::str::contains("Partner Stats Coming Soon!"))
        .stdout(predicate::str::contains(format!("/partners/{}", BEA)))
        .stdout(predicate::str::contains("Partner not found"));

    lookup.assert();
}

#[test]
fn test_compare_shows_fallback_when_stats_fail() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let config = signed_in(&mut server, &dir);

    let _users = server
        .mock("GET", "/rest/v1/users")
        .match_query(Matcher::Any)
        .with_status(406)
        .create();

    fitfam(&config)
        .args(["compare", BEA])
        .assert()
        .success()
        .stdout(predicate::str::contains("Partner not found"))
        .stdout(predicate::str::contains("No workout data available for this week"));
}

#[test]
fn test_favorite_patches_own_row() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let config = signed_in(&mut server, &dir);

    let patch = server
        .mock("PATCH", "/rest/v1/workout_partners")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), format!("eq.{}", ME)),
            Matcher::UrlEncoded("partner_id".into(), format!("eq.{}", BEA)),
            Matcher::UrlEncoded("status".into(), "eq.accepted".into()),
        ]))
        .match_body(Matcher::Json(json!({"is_favorite": false})))
        .with_status(204)
        .expect(1)
        .create();

    fitfam(&config)
        .args(["partners", "favorite", BEA, "--off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed from favorites."));

    patch.assert();
}

fn mock_partner_stats(server: &mut Server) {
    for (id, name) in [(ME, "Me"), (BEA, "Bea")] {
        server
            .mock("GET", "/rest/v1/users")
            .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{}", id)))
            .with_header("content-type", "application/json")
            .with_body(person(id, name).to_string())
            .create();
    }
    server
        .mock("POST", "/rest/v1/rpc/get_partner_stats")
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "total_workouts": 3,
                "completed_workouts": 2,
                "total_weight": 4100.0,
                "completion_rate": 66.7
            }])
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/rest/v1/daily_workouts")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();
}

fn mock_favorite_flag(server: &mut Server, is_favorite: bool) -> mockito::Mock {
    server
        .mock("GET", "/rest/v1/workout_partners")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "is_favorite".into()),
            Matcher::UrlEncoded("user_id".into(), format!("eq.{}", ME)),
            Matcher::UrlEncoded("partner_id".into(), format!("eq.{}", BEA)),
        ]))
        .with_header("content-type", "application/json")
        .with_body(json!([{ "is_favorite": is_favorite }]).to_string())
        .expect(1)
        .create()
}

#[test]
fn test_compare_toggles_favorite() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let config = signed_in(&mut server, &dir);
    mock_partner_stats(&mut server);
    let flag = mock_favorite_flag(&mut server, false);
    let patch = server
        .mock("PATCH", "/rest/v1/workout_partners")
        .match_query(Matcher::UrlEncoded("partner_id".into(), format!("eq.{}", BEA)))
        .match_body(Matcher::Json(json!({"is_favorite": true})))
        .with_status(204)
        .expect(1)
        .create();

    fitfam(&config)
        .args(["compare", BEA, "--toggle-favorite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You vs Bea  @bea"))
        .stdout(predicate::str::contains("Weekly Workouts"))
        .stdout(predicate::str::contains("★ Favorited"))
        .stdout(predicate::str::contains(format!("/partners/{}", BEA)));

    flag.assert();
    patch.assert();
}

#[test]
fn test_show_renders_profile_with_favorite_state() {
    let mut server = Server::new();
    let dir = TempDir::new().unwrap();
    let config = signed_in(&mut server, &dir);
    mock_partner_stats(&mut server);
    let flag = mock_favorite_flag(&mut server, true);

    fitfam(&config)
        .args(["partners", "show", BEA])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bea  @bea  ★ Favorited"))
        .stdout(predicate::str::contains("3 workouts, 2 completed (67%)"));

    flag.assert();
}
