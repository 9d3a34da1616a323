//! Table creation derived from the entity definitions.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, EntityTrait, Schema};

use crate::entities::{reminder, todo};

/// Create the `reminders` and `todos` tables and their indexes if absent.
pub async fn create_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let schema = Schema::new(conn.get_database_backend());
    create_entity_table(conn, &schema, reminder::Entity).await?;
    create_entity_table(conn, &schema, todo::Entity).await?;
    Ok(())
}

async fn create_entity_table<C, E>(conn: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait + Copy,
{
    let backend = conn.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    let indexes = schema.create_index_from_entity(entity);

    match backend {
        // MySQL has no CREATE INDEX IF NOT EXISTS; declare indexes inline.
        DbBackend::MySql => {
            for mut index in indexes {
                table.index(&mut index);
            }
            conn.execute(backend.build(&table)).await?;
        }
        _ => {
            conn.execute(backend.build(&table)).await?;
            for mut index in indexes {
                index.if_not_exists();
                conn.execute(backend.build(&index)).await?;
            }
        }
    }

    Ok(())
}
