use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use crate::access::Actor;
use crate::config::GradingConfig;
use crate::models::notifications::{NewNotification, NotificationKind};
use crate::services::{AssignmentService, GradeService, ReportService, SubmissionService};
use crate::storage::Storage;
use crate::test_support::{BASE_TS, Scenario, ts};
use crate::utils::{JwtUtils, json_error_handler, path_error_handler, query_error_handler};

const SECRET: &str = "route-test-secret";

macro_rules! init_app {
    ($scenario:expr) => {{
        let s: &Scenario = &$scenario;
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::PathConfig::default().error_handler(path_error_handler))
                .app_data(web::Data::new(s.ctx.storage.clone()))
                .app_data(web::Data::new(JwtUtils::new(SECRET)))
                .app_data(web::Data::new(AssignmentService::new(s.ctx.clone())))
                .app_data(web::Data::new(SubmissionService::new(s.ctx.clone())))
                .app_data(web::Data::new(GradeService::new(
                    s.ctx.clone(),
                    GradingConfig::default(),
                )))
                .app_data(web::Data::new(ReportService::new(s.ctx.clone())))
                .configure(super::configure_routes),
        )
        .await
    }};
}

fn bearer(actor: &Actor) -> (&'static str, String) {
    let token = JwtUtils::new(SECRET)
        .generate_access_token(actor.id, &actor.role.to_string(), chrono::Duration::minutes(5))
        .unwrap();
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_assignment_lifecycle_over_http() {
    let s = Scenario::new(3).await;
    let app = init_app!(s);

    // 创建
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(bearer(&s.owner))
        .set_json(json!({
            "class_id": s.class_id,
            "title": "  Essay one ",
            "due_date": ts(BASE_TS + 86_400).to_rfc3339(),
            "max_points": 20.0,
            "assignment_type": "essay",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["title"], "Essay one");
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    // 学生提交
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
        .insert_header(bearer(&s.students[0]))
        .set_json(json!({ "submission_text": "draft" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["resubmitted"], false);
    let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

    // 评分
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
        .insert_header(bearer(&s.owner))
        .set_json(json!({ "score": 18.0, "feedback": "good" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["grade"]["percentage"], 90.0);
    assert_eq!(body["data"]["grade"]["letter_grade"], "A-");

    // 对账报告
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{assignment_id}/report"))
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let stats = &body["data"]["statistics"];
    assert_eq!(stats["total_enrolled"], 3);
    assert_eq!(stats["total_submitted"], 1);
    assert_eq!(stats["total_missing"], 2);
    assert_eq!(stats["submission_rate"], 33);

    // 学生的加权总评
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/classes/{}/students/{}/summary",
            s.class_id, s.students[0].id
        ))
        .insert_header(bearer(&s.students[0]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["weighted_percentage"], 90.0);

    // 有提交的作业删除后变为停用
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/assignments/{assignment_id}"))
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["outcome"], "deactivated");
}

#[actix_web::test]
async fn test_errors_map_to_status_codes() {
    let s = Scenario::new(2).await;
    let assignment = s.assignment(24, 10.0).await;
    let app = init_app!(s);

    // 未认证
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{}", assignment.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 学生不能查看报告
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{}/report", assignment.id))
        .insert_header(bearer(&s.students[0]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2001);

    // 未选课学生提交
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{}/submissions", assignment.id))
        .insert_header(bearer(&s.outsider))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2005);

    // 不存在的作业
    let req = test::TestRequest::get()
        .uri("/api/v1/assignments/9999")
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 非法路径参数
    let req = test::TestRequest::get()
        .uri("/api/v1/assignments/abc")
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 空的更新
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/assignments/{}", assignment.id))
        .insert_header(bearer(&s.owner))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2009);
}

#[actix_web::test]
async fn test_export_sets_attachment_headers() {
    let s = Scenario::new(2).await;
    let assignment = s.assignment(24, 10.0).await;
    let app = init_app!(s);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{}/report/export", assignment.id))
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        format!(
            "attachment; filename=\"assignment_{}_submissions.csv\"",
            assignment.id
        )
        .as_str()
    );
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("Student Name,Email,Username,Status"));
    assert_eq!(text.lines().count(), 3);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/assignments/{}/report/export?format=JSON",
            assignment.id
        ))
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statistics"]["total_missing"], 2);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/assignments/{}/report/export?format=xlsx",
            assignment.id
        ))
        .insert_header(bearer(&s.owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_notifications_are_scoped_to_caller() {
    let s = Scenario::new(2).await;
    let storage: Arc<dyn Storage> = s.ctx.storage.clone();
    storage
        .create_notifications(vec![
            NewNotification {
                user_id: s.students[0].id,
                kind: NotificationKind::GradeReleased,
                title: "Lab report".to_string(),
                content: Some("A（95.00%）".to_string()),
                reference_type: Some("assignment".to_string()),
                reference_id: Some(1),
                created_at: ts(BASE_TS),
            },
            NewNotification {
                user_id: s.students[1].id,
                kind: NotificationKind::AssignmentCreated,
                title: "Lab report".to_string(),
                content: None,
                reference_type: Some("assignment".to_string()),
                reference_id: Some(1),
                created_at: ts(BASE_TS),
            },
        ])
        .await
        .unwrap();
    let app = init_app!(s);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications")
        .insert_header(bearer(&s.students[0]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "grade_released");
}
