use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::params;

use crate::domain::entities::product::RawProduct;
use crate::infra::sqlite::schema::open_connection;

pub fn load_products(db_path: &Path) -> Result<Vec<RawProduct>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, code, name, category, quantity, date, verified
             FROM product
             ORDER BY id ASC",
        )
        .context("failed to prepare products query")?;

    let products = stmt
        .query_map([], |row| {
            let verified: i64 = row.get(6)?;
            Ok(RawProduct {
                id: row.get(0)?,
                code: row.get(1)?,
                name: row.get(2)?,
                category: row.get(3)?,
                quantity: row.get(4)?,
                date: row.get(5)?,
                verified: verified != 0,
            })
        })
        .context("failed to query products")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect products")?;

    Ok(products)
}

/// Swaps the whole catalog in one transaction.
pub fn replace_products(db_path: &Path, products: &[RawProduct]) -> Result<usize> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start replace transaction")?;

    tx.execute("DELETE FROM product", [])
        .context("failed to clear products")?;

    let mut insert_product = tx
        .prepare(
            "INSERT INTO product(id, code, name, category, quantity, date, verified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .context("failed to prepare product insert")?;

    for product in products {
        insert_product
            .execute(params![
                product.id,
                product.code,
                product.name,
                product.category,
                product.quantity,
                product.date,
                if product.verified { 1 } else { 0 },
            ])
            .with_context(|| format!("failed to insert product #{}", product.id))?;
    }
    drop(insert_product);

    tx.commit().context("failed to commit replace transaction")?;
    Ok(products.len())
}

pub fn delete_product(db_path: &Path, product_id: i64) -> Result<()> {
    let conn = open_connection(db_path)?;
    let deleted = conn
        .execute("DELETE FROM product WHERE id = ?1", params![product_id])
        .with_context(|| format!("failed to delete product #{product_id}"))?;
    if deleted == 0 {
        anyhow::bail!("product #{product_id} not found")
    }
    Ok(())
}
