use sqlx::{
    sqlite::{SqliteQueryResult, SqliteRow},
    FromRow, SqliteConnection,
};

use crate::{error::Result, types::uuid::Uuid};

/// Table naming, usually derived through `derives::Names`.
pub trait Names {
    const NAME_SINGULAR: &'static str;
    const NAME_PLURAL: &'static str;
    const TABLE_NAME: &'static str;
}

pub trait Id {
    fn id(&self) -> &Uuid;
}

pub trait CreateTable {
    async fn create_table(conn: &mut SqliteConnection) -> Result<()>;
}

pub trait Insertable {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<SqliteQueryResult>;
}

pub trait Updateable {
    /// Overwrites the stored row identified by `self` with the fields of `new`.
    async fn update(&self, conn: &mut SqliteConnection, new: &Self) -> Result<SqliteQueryResult>;
}

pub trait Queryable: Names + Sized + Send + Unpin + for<'r> FromRow<'r, SqliteRow> {
    const ORDER_BY: &'static str = "id";

    async fn get_by_id(conn: &mut SqliteConnection, id: &Uuid) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM {} WHERE id = ?1",
            Self::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?)
    }

    async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        Ok(sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM {} ORDER BY {}",
            Self::TABLE_NAME,
            Self::ORDER_BY
        ))
        .fetch_all(conn)
        .await?)
    }

    async fn exists(conn: &mut SqliteConnection, id: &Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?1",
            Self::TABLE_NAME
        ))
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(count > 0)
    }
}

pub trait Removeable: Names {
    async fn remove(conn: &mut SqliteConnection, id: &Uuid) -> Result<SqliteQueryResult> {
        Ok(
            sqlx::query(&format!("DELETE FROM {} WHERE id = ?1", Self::TABLE_NAME))
                .bind(id)
                .execute(conn)
                .await?,
        )
    }

    async fn clear(conn: &mut SqliteConnection) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!("DELETE FROM {}", Self::TABLE_NAME))
            .execute(conn)
            .await?)
    }
}

/// Join table linking rows of `A` to rows of `B`.
///
/// Rows are removed together with their `A` row, while a `B` row can't be
/// removed as long as a join row points at it.
pub trait JunctionTable<A, B>: Sized + Send + Unpin + for<'r> FromRow<'r, SqliteRow>
where
    A: Names,
    B: Queryable,
{
    const TABLE_NAME: &'static str;
    const COLUMN_A: &'static str;
    const COLUMN_B: &'static str;

    fn get_id_a(&self) -> &Uuid;

    fn get_id_b(&self) -> &Uuid;

    async fn create_table(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                {a} TEXT NOT NULL,
                {b} TEXT NOT NULL,
                PRIMARY KEY ({a}, {b}),
                FOREIGN KEY ({a}) REFERENCES {table_a} (id) ON DELETE CASCADE,
                FOREIGN KEY ({b}) REFERENCES {table_b} (id) ON DELETE RESTRICT
            );
            "#,
            table = Self::TABLE_NAME,
            a = Self::COLUMN_A,
            b = Self::COLUMN_B,
            table_a = A::TABLE_NAME,
            table_b = B::TABLE_NAME,
        ))
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        Ok(sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM {} ORDER BY {}, {}",
            Self::TABLE_NAME,
            Self::COLUMN_A,
            Self::COLUMN_B
        ))
        .fetch_all(conn)
        .await?)
    }

    /// All `B` rows linked to the `A` row with id `id_a`.
    async fn get_all_for_a(conn: &mut SqliteConnection, id_a: &Uuid) -> Result<Vec<B>> {
        Ok(sqlx::query_as::<_, B>(&format!(
            r#"
            SELECT {table_b}.* FROM {table_b}
            INNER JOIN {table} ON {table}.{b} = {table_b}.id
            WHERE {table}.{a} = ?1
            ORDER BY {table_b}.{order};
            "#,
            table = Self::TABLE_NAME,
            a = Self::COLUMN_A,
            b = Self::COLUMN_B,
            table_b = B::TABLE_NAME,
            order = B::ORDER_BY,
        ))
        .bind(id_a)
        .fetch_all(conn)
        .await?)
    }

    /// Number of `A` rows linked to the `B` row with id `id_b`.
    async fn count_for_b(conn: &mut SqliteConnection, id_b: &Uuid) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1",
            Self::TABLE_NAME,
            Self::COLUMN_B
        ))
        .bind(id_b)
        .fetch_one(conn)
        .await?)
    }

    /// Links `id_a` to `id_b`, doing nothing if the link already exists.
    async fn attach(
        conn: &mut SqliteConnection,
        id_a: &Uuid,
        id_b: &Uuid,
    ) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!(
            "INSERT OR IGNORE INTO {} ( {}, {} ) VALUES ( ?1, ?2 )",
            Self::TABLE_NAME,
            Self::COLUMN_A,
            Self::COLUMN_B
        ))
        .bind(id_a)
        .bind(id_b)
        .execute(conn)
        .await?)
    }

    async fn detach(
        conn: &mut SqliteConnection,
        id_a: &Uuid,
        id_b: &Uuid,
    ) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ?1 AND {} = ?2",
            Self::TABLE_NAME,
            Self::COLUMN_A,
            Self::COLUMN_B
        ))
        .bind(id_a)
        .bind(id_b)
        .execute(conn)
        .await?)
    }

    /// Replaces every link of `id_a` with links to `ids_b`.
    async fn set_for_a(conn: &mut SqliteConnection, id_a: &Uuid, ids_b: &[Uuid]) -> Result<()> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ?1",
            Self::TABLE_NAME,
            Self::COLUMN_A
        ))
        .bind(id_a)
        .execute(&mut *conn)
        .await?;
        for id_b in ids_b {
            Self::attach(&mut *conn, id_a, id_b).await?;
        }
        Ok(())
    }

    async fn clear(conn: &mut SqliteConnection) -> Result<SqliteQueryResult> {
        Ok(sqlx::query(&format!("DELETE FROM {}", Self::TABLE_NAME))
            .execute(conn)
            .await?)
    }
}
