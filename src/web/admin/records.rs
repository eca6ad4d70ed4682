//! Departments, enrollments, fees, grades and attendance.

use super::{done, form_page};
use crate::{
    core::{attendance, department, enrollment, fee, grade, session::Principal},
    entities::DepartmentName,
    errors::Result,
    web::{
        AppState,
        forms::{
            AttendanceForm, DepartmentForm, EnrollmentForm, FeeForm, GradeForm, NoticeQuery,
            parse_amount, parse_int,
        },
        principal::AdminPrincipal,
        render::{self, Field},
        rerender,
    },
};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, Response},
};
use sea_orm::Iterable;

const ATTENDANCE_STATUSES: [(&str, &str); 3] = [("P", "Present"), ("A", "Absent"), ("L", "Late")];

fn list_page(
    principal: &Principal,
    title: &str,
    query: &NoticeQuery,
    add: Option<(&str, &str)>,
    table: &str,
) -> Html<String> {
    let add = add.map_or_else(String::new, |(href, label)| {
        format!("<p>{}</p>", render::link(href, label))
    });
    let body = format!("{}{add}{table}", render::notice(query.message()));
    render::page(title, Some(principal), &body)
}

// Departments

fn department_form(principal: &Principal, current: &str, error: Option<&str>) -> Html<String> {
    let options: Vec<_> = DepartmentName::iter()
        .map(|d| (d.code(), d.title()))
        .collect();
    form_page(
        principal,
        "Add Department",
        "/admin/departments/add",
        &[Field::select("dep_name", "Department", &options, current)],
        error,
    )
}

/// `GET /admin/departments`
pub async fn list_departments(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let rows: Vec<_> = department::list_departments(&state.db)
        .await?
        .into_iter()
        .map(|d| {
            (
                vec![
                    d.dep_id.to_string(),
                    d.dep_name.code().to_string(),
                    d.dep_name.title().to_string(),
                ],
                Some(render::link(
                    &format!("/admin/departments/delete/{}", d.dep_id),
                    "Delete",
                )),
            )
        })
        .collect();
    Ok(list_page(
        &principal,
        "Departments",
        &query,
        Some(("/admin/departments/add", "Add department")),
        &render::table(&["ID", "Code", "Name", ""], &rows),
    ))
}

/// `GET /admin/departments/add`
pub async fn add_department_form(AdminPrincipal(principal): AdminPrincipal) -> Html<String> {
    department_form(&principal, "", None)
}

/// `POST /admin/departments/add`
pub async fn add_department_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Form(form): Form<DepartmentForm>,
) -> Result<Response> {
    match department::create_department(&state.db, &form.dep_name).await {
        Ok(_) => Ok(done("/admin/departments", "department_added")),
        Err(e) => rerender(e, |message| {
            department_form(&principal, &form.dep_name, Some(message))
        }),
    }
}

/// `GET|POST /admin/departments/delete/:id`
pub async fn delete_department(
    State(state): State<AppState>,
    Path(dep_id): Path<i64>,
) -> Result<Response> {
    department::delete_department(&state.db, dep_id).await?;
    Ok(done("/admin/departments", "department_deleted"))
}

// Enrollments

fn enrollment_form(
    principal: &Principal,
    form: &EnrollmentForm,
    error: Option<&str>,
) -> Html<String> {
    form_page(
        principal,
        "Enroll Student",
        "/admin/enrollments/add",
        &[
            Field::number("student_id", "Student roll number", &form.student_id),
            Field::number("course_id", "Course ID", &form.course_id),
        ],
        error,
    )
}

/// `GET /admin/enrollments`
pub async fn list_enrollments(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let mut rows = Vec::new();
    for e in enrollment::list_enrollments(&state.db).await? {
        let grade = grade::get_grade_for_enrollment(&state.db, e.enrollment_id)
            .await?
            .map_or_else(
                || "-".to_string(),
                |g| format!("{} ({})", g.letter.as_str(), g.marks),
            );
        let marks = attendance::attendance_for_enrollment(&state.db, e.enrollment_id)
            .await?
            .iter()
            .map(|a| a.status.code())
            .collect::<String>();
        rows.push((
            vec![
                e.enrollment_id.to_string(),
                e.student_id.to_string(),
                e.course_id.to_string(),
                grade,
                marks,
            ],
            Some(render::link(
                &format!("/admin/enrollments/delete/{}", e.enrollment_id),
                "Delete",
            )),
        ));
    }

    let links = format!(
        "<p>{} {}</p>",
        render::link("/admin/grades/add", "Record grade"),
        render::link("/admin/attendance/add", "Record attendance"),
    );
    let table = render::table(
        &["ID", "Student", "Course", "Grade", "Attendance", ""],
        &rows,
    );
    Ok(list_page(
        &principal,
        "Enrollments",
        &query,
        Some(("/admin/enrollments/add", "Enroll student")),
        &format!("{links}{table}"),
    ))
}

/// `GET /admin/enrollments/add`
pub async fn add_enrollment_form(AdminPrincipal(principal): AdminPrincipal) -> Html<String> {
    enrollment_form(&principal, &EnrollmentForm::default(), None)
}

/// `POST /admin/enrollments/add`
pub async fn add_enrollment_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Form(form): Form<EnrollmentForm>,
) -> Result<Response> {
    let result = async {
        let student_id = parse_int("student_id", &form.student_id)?;
        let course_id = parse_int("course_id", &form.course_id)?;
        enrollment::enroll(&state.db, student_id, course_id).await
    }
    .await;
    match result {
        Ok(_) => Ok(done("/admin/enrollments", "enrolled")),
        Err(e) => rerender(e, |message| enrollment_form(&principal, &form, Some(message))),
    }
}

/// `GET|POST /admin/enrollments/delete/:id`
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<i64>,
) -> Result<Response> {
    enrollment::delete_enrollment(&state.db, enrollment_id).await?;
    Ok(done("/admin/enrollments", "enrollment_deleted"))
}

// Fees

fn fee_form(principal: &Principal, form: &FeeForm, error: Option<&str>) -> Html<String> {
    form_page(
        principal,
        "Add Fee",
        "/admin/fees/add",
        &[
            Field::number("student_id", "Student roll number", &form.student_id),
            Field::number("course_id", "Course ID", &form.course_id),
            Field::text("amount", "Amount", &form.amount),
        ],
        error,
    )
}

/// `GET /admin/fees`
pub async fn list_fees(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let fees = fee::list_fees(&state.db).await?;
    let summary = fee::summarize(&fees);
    let rows: Vec<_> = fees
        .into_iter()
        .map(|f| {
            let actions = format!(
                "{} {}",
                render::link(&format!("/admin/fees/pay/{}", f.fee_id), "Mark paid"),
                render::link(&format!("/admin/fees/delete/{}", f.fee_id), "Delete"),
            );
            (
                vec![
                    f.fee_id.to_string(),
                    f.student_id.to_string(),
                    f.course_id.to_string(),
                    format!("{:.2}", f.amount),
                    f.fee_status.as_str().to_string(),
                ],
                Some(actions),
            )
        })
        .collect();

    let table = format!(
        "<p>Total charged: {:.2} | Outstanding: {:.2}</p>{}",
        summary.total,
        summary.pending,
        render::table(&["ID", "Student", "Course", "Amount", "Status", ""], &rows)
    );
    Ok(list_page(
        &principal,
        "Fees",
        &query,
        Some(("/admin/fees/add", "Add fee")),
        &table,
    ))
}

/// `GET /admin/fees/add`
pub async fn add_fee_form(AdminPrincipal(principal): AdminPrincipal) -> Html<String> {
    fee_form(&principal, &FeeForm::default(), None)
}

/// `POST /admin/fees/add`
pub async fn add_fee_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Form(form): Form<FeeForm>,
) -> Result<Response> {
    let result = async {
        let student_id = parse_int("student_id", &form.student_id)?;
        let course_id = parse_int("course_id", &form.course_id)?;
        let amount = parse_amount(&form.amount)?;
        fee::create_fee(&state.db, student_id, course_id, amount).await
    }
    .await;
    match result {
        Ok(_) => Ok(done("/admin/fees", "fee_added")),
        Err(e) => rerender(e, |message| fee_form(&principal, &form, Some(message))),
    }
}

/// `GET|POST /admin/fees/pay/:id`
pub async fn pay_fee(State(state): State<AppState>, Path(fee_id): Path<i64>) -> Result<Response> {
    fee::mark_paid(&state.db, fee_id).await?;
    Ok(done("/admin/fees", "fee_paid"))
}

/// `GET|POST /admin/fees/delete/:id`
pub async fn delete_fee(State(state): State<AppState>, Path(fee_id): Path<i64>) -> Result<Response> {
    fee::delete_fee(&state.db, fee_id).await?;
    Ok(done("/admin/fees", "fee_deleted"))
}

// Grades

fn grade_form(principal: &Principal, form: &GradeForm, error: Option<&str>) -> Html<String> {
    form_page(
        principal,
        "Record Grade",
        "/admin/grades/add",
        &[
            Field::number("enrollment_id", "Enrollment ID", &form.enrollment_id),
            Field::number("marks", "Marks (1-100)", &form.marks),
            Field::text("grade", "Letter grade", &form.grade),
        ],
        error,
    )
}

/// `GET /admin/grades/add`
pub async fn add_grade_form(AdminPrincipal(principal): AdminPrincipal) -> Html<String> {
    grade_form(&principal, &GradeForm::default(), None)
}

/// `POST /admin/grades/add`
pub async fn add_grade_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Form(form): Form<GradeForm>,
) -> Result<Response> {
    let result = async {
        let enrollment_id = parse_int("enrollment_id", &form.enrollment_id)?;
        let marks = parse_int("marks", &form.marks)?;
        grade::record_grade(&state.db, enrollment_id, marks, &form.grade).await
    }
    .await;
    match result {
        Ok(_) => Ok(done("/admin/enrollments", "grade_recorded")),
        Err(e) => rerender(e, |message| grade_form(&principal, &form, Some(message))),
    }
}

// Attendance

fn attendance_form(
    principal: &Principal,
    form: &AttendanceForm,
    error: Option<&str>,
) -> Html<String> {
    form_page(
        principal,
        "Record Attendance",
        "/admin/attendance/add",
        &[
            Field::number("enrollment_id", "Enrollment ID", &form.enrollment_id),
            Field::date("date", "Date", &form.date),
            Field::select("status", "Status", &ATTENDANCE_STATUSES, &form.status),
        ],
        error,
    )
}

/// `GET /admin/attendance/add`
pub async fn add_attendance_form(AdminPrincipal(principal): AdminPrincipal) -> Html<String> {
    attendance_form(&principal, &AttendanceForm::default(), None)
}

/// `POST /admin/attendance/add`
pub async fn add_attendance_submit(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Form(form): Form<AttendanceForm>,
) -> Result<Response> {
    let result = async {
        let enrollment_id = parse_int("enrollment_id", &form.enrollment_id)?;
        let date = attendance::parse_date(&form.date)?;
        attendance::record_attendance(&state.db, enrollment_id, date, &form.status).await
    }
    .await;
    match result {
        Ok(_) => Ok(done("/admin/enrollments", "attendance_recorded")),
        Err(e) => rerender(e, |message| {
            attendance_form(&principal, &form, Some(message))
        }),
    }
}
