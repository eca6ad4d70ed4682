//! Department business logic.
//!
//! Departments come from a fixed catalog of codes. Removing one detaches its
//! students rather than deleting them.

use crate::{
    entities::{Department, DepartmentName, Student, department, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info};

/// Retrieves all departments ordered by id.
pub async fn list_departments(db: &DatabaseConnection) -> Result<Vec<department::Model>> {
    Department::find()
        .order_by_asc(department::Column::DepId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a department by its unique ID.
pub async fn get_department_by_id(
    db: &DatabaseConnection,
    dep_id: i64,
) -> Result<Option<department::Model>> {
    Department::find_by_id(dep_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a department by name.
pub async fn get_department_by_name(
    db: &DatabaseConnection,
    name: DepartmentName,
) -> Result<Option<department::Model>> {
    Department::find()
        .filter(department::Column::DepName.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a department from a catalog code.
///
/// # Errors
/// - [`Error::Validation`] if the code is not in the catalog
/// - [`Error::Duplicate`] if the department already exists
pub async fn create_department(db: &DatabaseConnection, code: &str) -> Result<department::Model> {
    let name = DepartmentName::parse(code)
        .ok_or_else(|| Error::validation("dep_name", "Unknown department."))?;

    if get_department_by_name(db, name).await?.is_some() {
        return Err(Error::duplicate("dep_name", "Department already exists."));
    }

    department::ActiveModel {
        dep_name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::from_db_unique(e, "dep_name", "Department already exists."))
}

/// Deletes a department, detaching any students assigned to it.
pub async fn delete_department(db: &DatabaseConnection, dep_id: i64) -> Result<()> {
    if get_department_by_id(db, dep_id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "Department",
            id: dep_id,
        });
    }

    let txn = db.begin().await?;
    let detached = Student::update_many()
        .col_expr(
            student::Column::DepartmentId,
            Expr::value(Option::<i64>::None),
        )
        .filter(student::Column::DepartmentId.eq(dep_id))
        .exec(&txn)
        .await?;
    Department::delete_by_id(dep_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        dep_id,
        detached = detached.rows_affected,
        "Department deleted"
    );
    Ok(())
}

/// Makes sure every department in `names` exists. Existing rows are kept.
pub async fn seed_departments(db: &DatabaseConnection, names: &[DepartmentName]) -> Result<usize> {
    let mut created = 0;
    for &name in names {
        if get_department_by_name(db, name).await?.is_some() {
            debug!(department = name.code(), "Department already present");
            continue;
        }
        department::ActiveModel {
            dep_name: Set(name),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created += 1;
    }
    Ok(created)
}
