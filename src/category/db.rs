//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryColor, CategoryId, CategoryName, NewCategory},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if another category already has the name.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO categories (name, color) VALUES (?1, ?2);",
        (category.name.as_ref(), category.color.as_ref()),
    )?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created category {id} \"{}\"", category.name);

    Ok(Category {
        id,
        name: category.name,
        color: category.color,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color FROM categories WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color FROM categories ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's name and color. Returns an error if the category doesn't exist.
pub fn update_category(category: &Category, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3",
        (category.name.as_ref(), category.color.as_ref(), category.id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID.
///
/// # Errors
/// Returns [Error::CategoryInUse] if any budget line still refers to the
/// category and [Error::DeleteMissingCategory] if the category doesn't exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let line_count: i64 = tx.query_row(
        "SELECT COUNT(id) FROM budget_lines WHERE category_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;

    if line_count > 0 {
        return Err(Error::CategoryInUse(line_count));
    }

    let rows_affected = tx.execute("DELETE FROM categories WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    tx.commit()?;

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_color: String = row.get(2)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        color: CategoryColor::new_unchecked(&raw_color),
    })
}
