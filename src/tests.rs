use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use rusqlite::Connection;
use serde_json::{json, Value};

use crate::build_rocket;
use crate::todo::helpers::create_todo_table;

fn client() -> Client {
    let connection = Connection::open_in_memory().unwrap();
    create_todo_table(&connection).unwrap();
    Client::tracked(build_rocket(connection)).unwrap()
}

fn post_todo(client: &Client, body: Value) -> (Status, String) {
    let response = client
        .post("/todos/")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();
    (response.status(), response.into_string().unwrap_or_default())
}

fn put_todo(client: &Client, id: i64, body: Value) -> (Status, String) {
    let response = client
        .put(format!("/todos/{}/", id))
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();
    (response.status(), response.into_string().unwrap_or_default())
}

fn get_text(client: &Client, uri: &str) -> (Status, String) {
    let response = client.get(uri).dispatch();
    (response.status(), response.into_string().unwrap_or_default())
}

fn get_json(client: &Client, uri: &str) -> Value {
    let (status, body) = get_text(client, uri);
    assert_eq!(status, Status::Ok, "GET {} answered {}", uri, body);
    serde_json::from_str(&body).unwrap()
}

fn milk() -> Value {
    json!({
        "id": 1,
        "todo": "Buy milk",
        "priority": "HIGH",
        "status": "TO DO",
        "category": "HOME",
        "dueDate": "2023-05-01",
    })
}

fn seed(client: &Client) {
    post_todo(client, milk());
    post_todo(
        client,
        json!({
            "id": 2,
            "todo": "Finish report",
            "priority": "MEDIUM",
            "status": "IN PROGRESS",
            "category": "WORK",
            "dueDate": "2023-05-02",
        }),
    );
    post_todo(
        client,
        json!({
            "id": 3,
            "todo": "Learn Milk chemistry",
            "priority": "LOW",
            "status": "DONE",
            "category": "LEARNING",
            "dueDate": "2023-5-1",
        }),
    );
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn create_then_get() {
    let client = client();

    assert_eq!(
        post_todo(&client, milk()),
        (Status::Ok, "Todo Successfully Added".to_string())
    );
    assert_eq!(get_json(&client, "/todos/1/"), milk());
}

#[test]
fn create_normalizes_due_date() {
    let client = client();
    let mut body = milk();
    body["dueDate"] = json!("2023/5/1");

    assert_eq!(post_todo(&client, body).0, Status::Ok);
    assert_eq!(get_json(&client, "/todos/")[0]["dueDate"], "2023-05-01");
}

#[test]
fn create_rejects_missing_fields() {
    let client = client();
    let mut body = milk();
    body.as_object_mut().unwrap().remove("category");

    assert_eq!(
        post_todo(&client, body),
        (Status::BadRequest, "Missing Todo Category".to_string())
    );
    assert_eq!(get_json(&client, "/todos/"), json!([]));
}

#[test]
fn create_rejects_duplicate_ids() {
    let client = client();
    post_todo(&client, milk());

    assert_eq!(
        post_todo(&client, milk()),
        (Status::Conflict, "Todo Already Exists".to_string())
    );
}

#[test]
fn create_rejects_malformed_json() {
    let client = client();
    let response = client
        .post("/todos/")
        .header(ContentType::JSON)
        .body("{\"id\": ")
        .dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(response.into_string().unwrap(), "Invalid Request Body");
}

#[test]
fn body_validation_messages() {
    let client = client();
    let cases = [
        ("priority", "URGENT", "Invalid Todo Priority"),
        ("status", "PENDING", "Invalid Todo Status"),
        ("category", "GARDEN", "Invalid Todo Category"),
        ("dueDate", "not-a-date", "Invalid Due Date"),
        ("dueDate", "2023-02-30", "Invalid Due Date"),
    ];

    for (field, value, message) in cases {
        let mut body = milk();
        body[field] = json!(value);

        assert_eq!(
            post_todo(&client, body.clone()),
            (Status::BadRequest, message.to_string())
        );
        assert_eq!(
            put_todo(&client, 1, body),
            (Status::BadRequest, message.to_string())
        );
    }
}

#[test]
fn non_string_body_values_fail_their_own_field() {
    let client = client();
    let cases = [
        ("priority", json!(5), "Invalid Todo Priority"),
        ("priority", json!(null), "Invalid Todo Priority"),
        ("status", json!(null), "Invalid Todo Status"),
        ("category", json!(["HOME"]), "Invalid Todo Category"),
        ("dueDate", json!(20230501), "Invalid Due Date"),
    ];

    for (field, value, message) in cases {
        let mut body = milk();
        body[field] = value.clone();
        assert_eq!(
            post_todo(&client, body),
            (Status::BadRequest, message.to_string())
        );
        assert_eq!(
            put_todo(&client, 1, json!({ (field): value })),
            (Status::BadRequest, message.to_string())
        );
    }

    assert_eq!(
        put_todo(&client, 1, json!({ "priority": 5, "status": "BAD" })),
        (Status::BadRequest, "Invalid Todo Priority".to_string())
    );
}

#[test]
fn first_invalid_field_wins() {
    let client = client();
    let mut body = milk();
    body["status"] = json!("PENDING");
    body["dueDate"] = json!("never");
    body["priority"] = json!("SOMETIMES");

    assert_eq!(
        post_todo(&client, body),
        (Status::BadRequest, "Invalid Todo Priority".to_string())
    );
}

#[test]
fn query_validation_messages() {
    let client = client();

    assert_eq!(
        get_text(&client, "/todos/?priority=SOON"),
        (Status::BadRequest, "Invalid Todo Priority".to_string())
    );
    assert_eq!(
        get_text(&client, "/todos/?status=WAITING"),
        (Status::BadRequest, "Invalid Todo Status".to_string())
    );
    assert_eq!(
        get_text(&client, "/todos/?category=GARDEN"),
        (Status::BadRequest, "Invalid Todo Category".to_string())
    );
    assert_eq!(
        get_text(&client, "/agenda/?date=2023-02-30"),
        (Status::BadRequest, "Invalid Due Date".to_string())
    );
    assert_eq!(
        get_text(&client, "/agenda/?date=not-a-date"),
        (Status::BadRequest, "Invalid Due Date".to_string())
    );
}

#[test]
fn repeated_query_keys_are_rejected() {
    let client = client();

    assert_eq!(
        get_text(&client, "/todos/?priority=HIGH&priority=LOW"),
        (Status::BadRequest, "Invalid Todo Priority".to_string())
    );
    assert_eq!(
        get_text(&client, "/agenda/?date=2023-05-01&date=2023-05-02"),
        (Status::BadRequest, "Invalid Due Date".to_string())
    );
    assert_eq!(
        get_text(&client, "/todos/?search_q=a&search_q=b"),
        (Status::BadRequest, "Invalid Search Query".to_string())
    );
}

#[test]
fn routes_match_with_and_without_trailing_slash() {
    let client = client();

    let response = client
        .post("/todos")
        .header(ContentType::JSON)
        .body(milk().to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    assert_eq!(get_json(&client, "/todos/1"), milk());
    assert_eq!(get_json(&client, "/todos/1/"), milk());
    assert_eq!(ids(&get_json(&client, "/todos")), vec![1]);
    assert_eq!(ids(&get_json(&client, "/agenda?date=2023-05-01")), vec![1]);

    let response = client
        .put("/todos/1")
        .header(ContentType::JSON)
        .body(json!({ "todo": "Buy bread" }).to_string())
        .dispatch();
    assert_eq!(response.into_string().unwrap(), "Todo Updated");

    let response = client.delete("/todos/1").dispatch();
    assert_eq!(response.into_string().unwrap(), "Todo Deleted");
    assert_eq!(get_json(&client, "/todos/"), json!([]));
}

#[test]
fn list_filters() {
    let client = client();
    seed(&client);

    assert_eq!(ids(&get_json(&client, "/todos/")), vec![1, 2, 3]);
    assert_eq!(ids(&get_json(&client, "/todos/?search_q=milk")), vec![1]);
    assert_eq!(ids(&get_json(&client, "/todos/?priority=MEDIUM")), vec![2]);
    assert_eq!(ids(&get_json(&client, "/todos/?status=TO%20DO")), vec![1]);
    assert_eq!(ids(&get_json(&client, "/todos/?category=LEARNING")), vec![3]);
    assert_eq!(
        ids(&get_json(&client, "/todos/?search_q=Milk&priority=HIGH")),
        Vec::<i64>::new()
    );
}

#[test]
fn list_without_matches_is_empty_array() {
    let client = client();
    seed(&client);

    assert_eq!(get_json(&client, "/todos/?search_q=zebra"), json!([]));
}

#[test]
fn agenda_by_date() {
    let client = client();
    seed(&client);

    assert_eq!(ids(&get_json(&client, "/agenda/?date=2023-05-01")), vec![1, 3]);
    assert_eq!(ids(&get_json(&client, "/agenda/?date=2023-5-2")), vec![2]);
    assert_eq!(ids(&get_json(&client, "/agenda/?date=2024-01-01")), Vec::<i64>::new());
}

#[test]
fn agenda_without_date_returns_everything() {
    let client = client();
    seed(&client);

    assert_eq!(ids(&get_json(&client, "/agenda/")), vec![1, 2, 3]);
}

#[test]
fn update_status() {
    let client = client();
    post_todo(&client, milk());

    assert_eq!(
        put_todo(&client, 1, json!({ "status": "DONE" })),
        (Status::Ok, "Status Updated".to_string())
    );

    let mut expected = milk();
    expected["status"] = json!("DONE");
    assert_eq!(get_json(&client, "/todos/1/"), expected);
}

#[test]
fn update_confirmations() {
    let client = client();
    post_todo(&client, milk());

    let cases = [
        (json!({ "todo": "Buy oat milk" }), "Todo Updated"),
        (json!({ "priority": "LOW" }), "Priority Updated"),
        (json!({ "category": "WORK" }), "Category Updated"),
        (json!({ "dueDate": "2023-06-10" }), "Due Date Updated"),
    ];
    for (body, message) in cases {
        assert_eq!(put_todo(&client, 1, body), (Status::Ok, message.to_string()));
    }

    assert_eq!(
        get_json(&client, "/todos/1/"),
        json!({
            "id": 1,
            "todo": "Buy oat milk",
            "priority": "LOW",
            "status": "TO DO",
            "category": "WORK",
            "dueDate": "2023-06-10",
        })
    );
}

#[test]
fn update_applies_only_the_first_present_field() {
    let client = client();
    post_todo(&client, milk());

    assert_eq!(
        put_todo(&client, 1, json!({ "priority": "LOW", "status": "DONE" })),
        (Status::Ok, "Status Updated".to_string())
    );

    let todo = get_json(&client, "/todos/1/");
    assert_eq!(todo["status"], "DONE");
    assert_eq!(todo["priority"], "HIGH");
}

#[test]
fn update_without_fields_is_rejected() {
    let client = client();
    post_todo(&client, milk());

    assert_eq!(
        put_todo(&client, 1, json!({ "id": 1 })),
        (Status::BadRequest, "Nothing To Update".to_string())
    );
}

#[test]
fn update_of_missing_todo_is_not_found() {
    let client = client();

    assert_eq!(
        put_todo(&client, 9, json!({ "status": "DONE" })),
        (Status::NotFound, "Todo Not Found".to_string())
    );
}

#[test]
fn delete_is_idempotent() {
    let client = client();
    post_todo(&client, milk());

    for _ in 0..2 {
        let response = client.delete("/todos/1/").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().unwrap(), "Todo Deleted");
    }

    assert_eq!(
        get_text(&client, "/todos/1/"),
        (Status::NotFound, "Todo Not Found".to_string())
    );
}

#[test]
fn search_text_is_never_sql() {
    let client = client();
    seed(&client);

    let (status, body) = get_text(&client, "/todos/?search_q=%27%20OR%201%3D1%20--");
    assert_eq!(status, Status::Ok);
    assert_eq!(body, "[]");
    assert_eq!(ids(&get_json(&client, "/todos/")), vec![1, 2, 3]);
}

#[test]
fn unknown_routes_answer_in_plain_text() {
    let client = client();

    let response = client.get("/nowhere").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.content_type(), Some(ContentType::Plain));
}
